//! ### English
//! Input Translator: platform events in, embedded-surface events out.
//!
//! ### 中文
//! 输入转换器：输入平台事件，输出嵌入 surface 事件。
use super::keyboard;
use super::modifiers::EventFlags;
use super::platform::{
    PLATFORM_BUTTON_LEFT, PLATFORM_BUTTON_MIDDLE, PLATFORM_BUTTON_RIGHT, PlatformEvent,
};
use super::scroll::ScrollAccumulator;
use super::utf8::decode_utf8;
use crate::engine::config::{ScrollScale, SurfaceConfig};
use crate::engine::surface::{KeyEvent, KeyEventKind, MouseButton, SurfaceEvent, SurfaceHost};

/// ### English
/// Whether the widget currently owns pointer and keyboard input.
///
/// ### 中文
/// widget 当前是否拥有指针与键盘输入。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputRouting {
    pub hovered: bool,
    pub focused: bool,
}

/// ### English
/// Per-widget translation state: held modifiers/buttons, origin, last pointer, scroll backlog.
///
/// ### 中文
/// 每个 widget 的转换状态：按下的修饰键/按键、原点、最近指针位置、滚动积压。
pub struct InputTranslator {
    window_id: u32,
    smooth_scroll: bool,
    scroll_scale: ScrollScale,
    scroll_speed: f32,
    flags: EventFlags,
    origin: [f32; 2],
    last_position: (i32, i32),
    scroll: ScrollAccumulator,
}

fn platform_button(button: u8) -> Option<MouseButton> {
    match button {
        PLATFORM_BUTTON_LEFT => Some(MouseButton::Left),
        PLATFORM_BUTTON_MIDDLE => Some(MouseButton::Middle),
        PLATFORM_BUTTON_RIGHT => Some(MouseButton::Right),
        _ => None,
    }
}

impl InputTranslator {
    pub fn new(window_id: u32, config: &SurfaceConfig) -> Self {
        Self {
            window_id,
            smooth_scroll: config.smooth_scroll,
            scroll_scale: config.scroll_scale,
            scroll_speed: config.scroll_speed,
            flags: EventFlags::empty(),
            origin: [0.0, 0.0],
            last_position: (0, 0),
            scroll: ScrollAccumulator::new(),
        }
    }

    /// ### English
    /// Screen-space origin of the widget; applied to every following pointer event.
    ///
    /// ### 中文
    /// widget 的屏幕空间原点；作用于之后的每个指针事件。
    #[inline]
    pub fn set_origin(&mut self, origin: [f32; 2]) {
        self.origin = origin;
    }

    #[inline]
    pub fn flags(&self) -> EventFlags {
        self.flags
    }

    #[inline]
    pub fn last_position(&self) -> (i32, i32) {
        self.last_position
    }

    #[inline]
    pub fn pending_scroll(&self) -> (f32, f32) {
        self.scroll.pending()
    }

    fn to_local(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x - self.origin[0]).floor() as i32,
            (y - self.origin[1]).floor() as i32,
        )
    }

    /// ### English
    /// Translates one platform event. Returns whether it was forwarded to `surface`.
    ///
    /// ### 中文
    /// 转换一个平台事件；返回是否已转发给 `surface`。
    pub fn handle(
        &mut self,
        event: &PlatformEvent,
        routing: InputRouting,
        surface: &dyn SurfaceHost,
    ) -> bool {
        if event.window_id() != self.window_id {
            return false;
        }

        match *event {
            PlatformEvent::MouseMotion { x, y, .. } => {
                if !routing.hovered && !self.flags.any_button() {
                    return false;
                }
                let (x, y) = self.to_local(x, y);
                self.last_position = (x, y);
                surface.submit(SurfaceEvent::MouseMove {
                    x,
                    y,
                    modifiers: self.flags,
                    leave: false,
                });
                true
            }
            PlatformEvent::MouseButton {
                button,
                pressed,
                clicks,
                x,
                y,
                ..
            } => {
                let Some(button) = platform_button(button) else {
                    return false;
                };
                let flag = EventFlags::for_button(button);
                if pressed {
                    if !routing.hovered {
                        return false;
                    }
                    self.flags.insert(flag);
                } else {
                    if !self.flags.contains(flag) {
                        return false;
                    }
                    self.flags.remove(flag);
                }
                let (x, y) = self.to_local(x, y);
                self.last_position = (x, y);
                surface.submit(SurfaceEvent::MouseClick {
                    x,
                    y,
                    button,
                    up: !pressed,
                    click_count: u32::from(clicks.max(1)),
                    modifiers: self.flags,
                });
                true
            }
            PlatformEvent::MouseWheel {
                delta_x,
                delta_y,
                x,
                y,
                ..
            } => {
                if !routing.hovered {
                    return false;
                }
                let anchor = self.to_local(x, y);
                let scaled_x = delta_x * self.scroll_scale.x;
                let scaled_y = delta_y * self.scroll_scale.y;
                if self.smooth_scroll {
                    self.scroll.accumulate(scaled_x, scaled_y, anchor);
                } else {
                    surface.submit(SurfaceEvent::MouseWheel {
                        x: anchor.0,
                        y: anchor.1,
                        delta_x: scaled_x as i32,
                        delta_y: scaled_y as i32,
                        modifiers: self.flags,
                    });
                }
                true
            }
            PlatformEvent::Key {
                keycode,
                scancode,
                pressed,
                repeat,
                ..
            } => {
                // Lock keys toggle once per physical press; auto-repeat keeps the state.
                if pressed && !repeat {
                    if let Some(flag) = keyboard::toggled_modifier(keycode) {
                        self.flags.toggle(flag);
                    }
                }
                if let Some(flag) = keyboard::held_modifier(keycode) {
                    self.flags.set(flag, pressed);
                }
                if !routing.focused {
                    return false;
                }
                self.forward_key(keycode, scancode, pressed, repeat, surface)
            }
            PlatformEvent::TextInput { ref text, .. } => {
                if !routing.focused {
                    return false;
                }
                let mut forwarded = false;
                for character in decode_utf8(text) {
                    surface.submit(self.char_event(character, 0));
                    forwarded = true;
                }
                forwarded
            }
        }
    }

    fn forward_key(
        &self,
        keycode: u32,
        scancode: u32,
        pressed: bool,
        repeat: bool,
        surface: &dyn SurfaceHost,
    ) -> bool {
        let Some(windows_key_code) = keyboard::windows_key_code(keycode) else {
            log::trace!("unmapped key code {keycode:#x}");
            return false;
        };
        surface.submit(SurfaceEvent::Key(KeyEvent {
            kind: if pressed {
                KeyEventKind::RawKeyDown
            } else {
                KeyEventKind::KeyUp
            },
            windows_key_code,
            native_key_code: scancode,
            character: None,
            modifiers: self.flags,
            repeat: pressed && repeat,
        }));
        if pressed {
            if let Some(character) = keyboard::control_char(keycode) {
                surface.submit(self.char_event(character, scancode));
            }
        }
        true
    }

    fn char_event(&self, character: char, native_key_code: u32) -> SurfaceEvent {
        SurfaceEvent::Key(KeyEvent {
            kind: KeyEventKind::Char,
            windows_key_code: u32::from(character),
            native_key_code,
            character: Some(character),
            modifiers: self.flags,
            repeat: false,
        })
    }

    /// ### English
    /// Per-frame flush of the smooth-scroll backlog.
    ///
    /// ### 中文
    /// 每帧清算平滑滚动积压。
    pub fn tick(&mut self, delta_time: f32, surface: &dyn SurfaceHost) {
        if let Some(step) = self.scroll.step(self.scroll_speed, delta_time) {
            surface.submit(SurfaceEvent::MouseWheel {
                x: step.x,
                y: step.y,
                delta_x: step.delta_x,
                delta_y: step.delta_y,
                modifiers: self.flags,
            });
        }
    }

    /// ### English
    /// Reports the pointer leaving the widget at its last known position.
    ///
    /// ### 中文
    /// 以最近已知位置报告指针离开 widget。
    pub fn mouse_leave(&self, surface: &dyn SurfaceHost) {
        surface.submit(SurfaceEvent::MouseMove {
            x: self.last_position.0,
            y: self.last_position.1,
            modifiers: self.flags,
            leave: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::keyboard::{KEY_CAPS_LOCK, KEY_LSHIFT, KEY_RETURN};
    use crate::engine::surface::testing::RecordingHost;

    const WINDOW: u32 = 3;
    const OVER: InputRouting = InputRouting {
        hovered: true,
        focused: true,
    };

    fn translator(config: SurfaceConfig) -> InputTranslator {
        let mut translator = InputTranslator::new(WINDOW, &config);
        translator.set_origin([100.0, 50.0]);
        translator
    }

    fn button(button: u8, pressed: bool, x: f32, y: f32) -> PlatformEvent {
        PlatformEvent::MouseButton {
            window_id: WINDOW,
            button,
            pressed,
            clicks: 1,
            x,
            y,
        }
    }

    fn key(keycode: u32, pressed: bool) -> PlatformEvent {
        key_with_repeat(keycode, pressed, false)
    }

    fn key_with_repeat(keycode: u32, pressed: bool, repeat: bool) -> PlatformEvent {
        PlatformEvent::Key {
            window_id: WINDOW,
            keycode,
            scancode: 40,
            pressed,
            repeat,
        }
    }

    #[test]
    fn pointer_positions_are_widget_local() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());
        let motion = PlatformEvent::MouseMotion {
            window_id: WINDOW,
            x: 130.5,
            y: 60.0,
        };
        assert!(translator.handle(&motion, OVER, &host));
        translator.set_origin([0.0, 0.0]);
        assert!(translator.handle(&motion, OVER, &host));

        let events = host.take();
        assert!(matches!(
            events[0],
            SurfaceEvent::MouseMove {
                x: 30,
                y: 10,
                leave: false,
                ..
            }
        ));
        assert!(matches!(events[1], SurfaceEvent::MouseMove { x: 130, y: 60, .. }));
    }

    #[test]
    fn other_windows_are_ignored() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());
        let motion = PlatformEvent::MouseMotion {
            window_id: WINDOW + 1,
            x: 0.0,
            y: 0.0,
        };
        assert!(!translator.handle(&motion, OVER, &host));
        assert!(host.take().is_empty());
    }

    #[test]
    fn button_flags_accumulate_incrementally() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());

        translator.handle(&key(KEY_LSHIFT, true), OVER, &host);
        translator.handle(&button(PLATFORM_BUTTON_LEFT, true, 110.0, 60.0), OVER, &host);
        translator.handle(&button(PLATFORM_BUTTON_RIGHT, true, 110.0, 60.0), OVER, &host);
        assert_eq!(
            translator.flags(),
            EventFlags::SHIFT | EventFlags::LEFT_MOUSE_BUTTON | EventFlags::RIGHT_MOUSE_BUTTON
        );

        translator.handle(&button(PLATFORM_BUTTON_LEFT, false, 110.0, 60.0), OVER, &host);
        translator.handle(&key(KEY_LSHIFT, false), OVER, &host);
        assert_eq!(translator.flags(), EventFlags::RIGHT_MOUSE_BUTTON);

        let clicks: Vec<_> = host
            .take()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::MouseClick {
                    button,
                    up,
                    modifiers,
                    ..
                } => Some((button, up, modifiers)),
                _ => None,
            })
            .collect();
        assert_eq!(
            clicks,
            vec![
                (MouseButton::Left, false, EventFlags::SHIFT | EventFlags::LEFT_MOUSE_BUTTON),
                (
                    MouseButton::Right,
                    false,
                    EventFlags::SHIFT
                        | EventFlags::LEFT_MOUSE_BUTTON
                        | EventFlags::RIGHT_MOUSE_BUTTON
                ),
                (MouseButton::Left, true, EventFlags::SHIFT | EventFlags::RIGHT_MOUSE_BUTTON),
            ]
        );
    }

    #[test]
    fn release_outside_is_forwarded_only_for_held_buttons() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());
        let outside = InputRouting {
            hovered: false,
            focused: true,
        };

        assert!(!translator.handle(&button(PLATFORM_BUTTON_LEFT, true, 0.0, 0.0), outside, &host));
        assert!(!translator.handle(&button(PLATFORM_BUTTON_LEFT, false, 0.0, 0.0), outside, &host));
        assert!(translator.handle(&button(PLATFORM_BUTTON_LEFT, true, 120.0, 60.0), OVER, &host));
        assert!(translator.handle(&button(PLATFORM_BUTTON_LEFT, false, 0.0, 0.0), outside, &host));
        assert_eq!(host.take().len(), 2);
    }

    #[test]
    fn text_input_forwards_each_scalar() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());
        assert!(translator.handle(&PlatformEvent::text(WINDOW, "aé😀"), OVER, &host));
        let chars: Vec<_> = host
            .take()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Key(KeyEvent {
                    kind: KeyEventKind::Char,
                    character,
                    ..
                }) => character,
                _ => None,
            })
            .collect();
        assert_eq!(chars, vec!['a', 'é', '😀']);
    }

    #[test]
    fn unfocused_widget_ignores_keys_but_tracks_modifiers() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());
        let unfocused = InputRouting {
            hovered: true,
            focused: false,
        };
        assert!(!translator.handle(&key(KEY_LSHIFT, true), unfocused, &host));
        assert!(!translator.handle(&PlatformEvent::text(WINDOW, "x"), unfocused, &host));
        assert_eq!(translator.flags(), EventFlags::SHIFT);
        assert!(host.take().is_empty());
    }

    #[test]
    fn lock_keys_ignore_auto_repeat() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());
        translator.handle(&key_with_repeat(KEY_CAPS_LOCK, true, false), OVER, &host);
        translator.handle(&key_with_repeat(KEY_CAPS_LOCK, true, true), OVER, &host);
        translator.handle(&key_with_repeat(KEY_CAPS_LOCK, false, false), OVER, &host);
        assert_eq!(translator.flags(), EventFlags::CAPS_LOCK);

        let repeats: Vec<_> = host
            .take()
            .into_iter()
            .map(|event| match event {
                SurfaceEvent::Key(key) => (key.kind, key.windows_key_code, key.repeat),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            repeats,
            vec![
                (KeyEventKind::RawKeyDown, 0x14, false),
                (KeyEventKind::RawKeyDown, 0x14, true),
                (KeyEventKind::KeyUp, 0x14, false),
            ]
        );

        translator.handle(&key(KEY_CAPS_LOCK, true), OVER, &host);
        assert_eq!(translator.flags(), EventFlags::empty());
    }

    #[test]
    fn enter_synthesizes_a_char_event() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());
        translator.handle(&key(KEY_RETURN, true), OVER, &host);
        translator.handle(&key(KEY_RETURN, false), OVER, &host);
        let kinds: Vec<_> = host
            .take()
            .into_iter()
            .map(|event| match event {
                SurfaceEvent::Key(key) => (key.kind, key.windows_key_code),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                (KeyEventKind::RawKeyDown, 0x0D),
                (KeyEventKind::Char, 0x0D),
                (KeyEventKind::KeyUp, 0x0D),
            ]
        );
    }

    #[test]
    fn smooth_wheel_is_spread_over_frames() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());
        let wheel = PlatformEvent::MouseWheel {
            window_id: WINDOW,
            delta_x: 0.0,
            delta_y: -1.0,
            x: 140.0,
            y: 90.0,
        };
        assert!(translator.handle(&wheel, OVER, &host));
        assert!(host.take().is_empty());

        let mut delivered = 0;
        for _ in 0..10 {
            translator.tick(1.0 / 120.0, &host);
        }
        for event in host.take() {
            match event {
                SurfaceEvent::MouseWheel { x, y, delta_y, .. } => {
                    assert_eq!((x, y), (40, 40));
                    assert!(delta_y < 0 && delta_y >= -40);
                    delivered += delta_y;
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(delivered, -120);
        assert_eq!(translator.pending_scroll(), (0.0, 0.0));
    }

    #[test]
    fn wheel_is_immediate_without_smooth_scroll() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig {
            smooth_scroll: false,
            ..SurfaceConfig::default()
        });
        let wheel = PlatformEvent::MouseWheel {
            window_id: WINDOW,
            delta_x: 0.5,
            delta_y: 2.0,
            x: 100.0,
            y: 50.0,
        };
        translator.handle(&wheel, OVER, &host);
        assert!(matches!(
            host.take()[..],
            [SurfaceEvent::MouseWheel {
                x: 0,
                y: 0,
                delta_x: 60,
                delta_y: 240,
                ..
            }]
        ));
    }

    #[test]
    fn leave_reports_last_position() {
        let host = RecordingHost::default();
        let mut translator = translator(SurfaceConfig::default());
        translator.handle(
            &PlatformEvent::MouseMotion {
                window_id: WINDOW,
                x: 105.0,
                y: 57.0,
            },
            OVER,
            &host,
        );
        host.take();
        translator.mouse_leave(&host);
        assert!(matches!(
            host.take()[..],
            [SurfaceEvent::MouseMove {
                x: 5,
                y: 7,
                leave: true,
                ..
            }]
        ));
    }
}
