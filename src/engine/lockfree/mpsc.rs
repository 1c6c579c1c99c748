use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

struct Node<T> {
    next: AtomicPtr<Node<T>>,
    value: UnsafeCell<MaybeUninit<T>>,
}

impl<T> Node<T> {
    fn boxed() -> *mut Self {
        Box::into_raw(Box::new(Self {
            next: AtomicPtr::new(ptr::null_mut()),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }))
    }
}

/// ### English
/// Unbounded lock-free MPSC queue (Vyukov intrusive linked list with a stub node).
///
/// - `push` is wait-free for producers: one `swap` on `tail` plus one store.
/// - `pop` must only ever run on one thread at a time; callers guarantee this by holding
///   the queue behind a non-`Clone` consumer handle.
/// - FIFO per producer; with a single producer the order is exactly the push order.
///
/// ### 中文
/// 无界无锁 MPSC 队列（Vyukov 侵入式链表 + stub 节点）。
///
/// - 生产者 `push` 无需等待：一次 `tail` 的 `swap` 加一次 store。
/// - `pop` 同一时刻只能在一个线程执行；调用方通过非 `Clone` 的消费者句柄保证这一点。
/// - 对每个生产者保持 FIFO；单生产者时顺序与 push 顺序完全一致。
pub(crate) struct MpscQueue<T> {
    /// ### English
    /// Consumer-owned stub/head node. Its `value` is always logically empty.
    ///
    /// ### 中文
    /// 消费者持有的 stub/head 节点；其 `value` 逻辑上始终为空。
    head: UnsafeCell<*mut Node<T>>,
    /// ### English
    /// Most recently pushed node (producers swap themselves in here).
    ///
    /// ### 中文
    /// 最近一次 push 的节点（生产者在此交换写入）。
    tail: AtomicPtr<Node<T>>,
}

unsafe impl<T: Send> Send for MpscQueue<T> {}
unsafe impl<T: Send> Sync for MpscQueue<T> {}

impl<T> MpscQueue<T> {
    pub(crate) fn new() -> Self {
        let stub = Node::boxed();
        Self {
            head: UnsafeCell::new(stub),
            tail: AtomicPtr::new(stub),
        }
    }

    /// ### English
    /// Appends `value`. Never blocks, never fails (allocation failure aborts like any `Box`).
    ///
    /// ### 中文
    /// 追加 `value`。不会阻塞，也不会失败（分配失败与普通 `Box` 一样 abort）。
    #[inline]
    pub(crate) fn push(&self, value: T) {
        let node = Node::boxed();
        unsafe {
            (*(*node).value.get()).write(value);
        }
        let prev = self.tail.swap(node, Ordering::AcqRel);
        unsafe {
            (*prev).next.store(node, Ordering::Release);
        }
    }

    /// ### English
    /// Removes the oldest value, or returns `None` if nothing is linked yet.
    ///
    /// A producer that has swapped `tail` but not yet linked `next` is observed as a short
    /// window; `pop` spins through it instead of reporting an empty queue, so values are never
    /// skipped out of order.
    ///
    /// # Safety
    /// No other thread may call `pop` concurrently.
    ///
    /// ### 中文
    /// 取出最早的值；若尚无已链接节点则返回 `None`。
    ///
    /// 生产者已交换 `tail` 但尚未写入 `next` 时存在一个很短的窗口；`pop` 会自旋等待该窗口，
    /// 而不是报告队列为空，从而保证不会乱序跳过。
    ///
    /// # Safety
    /// 不得有其它线程并发调用 `pop`。
    #[inline]
    pub(crate) unsafe fn pop(&self) -> Option<T> {
        let head = unsafe { *self.head.get() };
        let mut next = unsafe { (*head).next.load(Ordering::Acquire) };

        if next.is_null() {
            if self.tail.load(Ordering::Acquire) == head {
                return None;
            }
            loop {
                next = unsafe { (*head).next.load(Ordering::Acquire) };
                if !next.is_null() {
                    break;
                }
                std::hint::spin_loop();
            }
        }

        let value = unsafe { (*(*next).value.get()).assume_init_read() };
        unsafe {
            *self.head.get() = next;
            drop(Box::from_raw(head));
        }
        Some(value)
    }
}

impl<T> Drop for MpscQueue<T> {
    fn drop(&mut self) {
        while let Some(value) = unsafe { self.pop() } {
            drop(value);
        }
        unsafe {
            drop(Box::from_raw(*self.head.get()));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::MpscQueue;

    #[test]
    fn pops_in_push_order() {
        let queue = MpscQueue::new();
        for i in 0..10 {
            queue.push(i);
        }
        let drained: Vec<i32> = std::iter::from_fn(|| unsafe { queue.pop() }).collect();
        assert_eq!(drained, (0..10).collect::<Vec<_>>());
        assert!(unsafe { queue.pop() }.is_none());
    }

    struct Counted(Arc<AtomicUsize>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn drop_releases_pending_values() {
        let drops = Arc::new(AtomicUsize::new(0));
        {
            let queue = MpscQueue::new();
            for _ in 0..5 {
                queue.push(Counted(drops.clone()));
            }
            drop(unsafe { queue.pop() });
        }
        assert_eq!(drops.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn concurrent_single_producer_keeps_order() {
        const COUNT: usize = 50_000;
        let queue = Arc::new(MpscQueue::new());
        let producer = {
            let queue = queue.clone();
            thread::spawn(move || {
                for i in 0..COUNT {
                    queue.push(i);
                }
            })
        };

        let mut expected = 0;
        while expected < COUNT {
            if let Some(value) = unsafe { queue.pop() } {
                assert_eq!(value, expected);
                expected += 1;
            } else {
                std::hint::spin_loop();
            }
        }
        producer.join().unwrap();
        assert!(unsafe { queue.pop() }.is_none());
    }
}
