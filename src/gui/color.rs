use serde::Deserialize;

/// Opacity of a drawing operation, from fully transparent to fully covering.
pub type Opa = u8;

pub const OPA_TRANSP: Opa = 0;
pub const OPA_50: Opa = 127;
pub const OPA_COVER: Opa = 255;

/// Native color representation of the rendering core.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
    pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);
    pub const SILVER: Color = Color::rgb(0xc0, 0xc0, 0xc0);
    pub const NAVY: Color = Color::rgb(0x00, 0x00, 0x80);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Color {
        Color { red, green, blue }
    }

    /// Interpolates from `bg` toward `fg`.
    /// `OPA_COVER` yields `fg` exactly, `OPA_TRANSP` yields `bg` exactly.
    pub fn mix(fg: Color, bg: Color, opa: Opa) -> Color {
        let channel = |f: u8, b: u8| -> u8 {
            let opa = opa as u32;
            ((f as u32 * opa + b as u32 * (255 - opa) + 127) / 255) as u8
        };
        Color {
            red: channel(fg.red, bg.red),
            green: channel(fg.green, bg.green),
            blue: channel(fg.blue, bg.blue),
        }
    }

    /// Scales every channel toward black, used for borders and shading.
    pub fn darken(self, opa: Opa) -> Color {
        Color::mix(Color::BLACK, self, opa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn mix_endpoints_are_exact() {
        let fg = Color::rgb(200, 10, 99);
        let bg = Color::rgb(3, 250, 40);
        assert_eq!(Color::mix(fg, bg, OPA_COVER), fg);
        assert_eq!(Color::mix(fg, bg, OPA_TRANSP), bg);
    }

    #[test_log::test]
    fn mix_halfway_rounds_to_nearest() {
        let mixed = Color::mix(Color::WHITE, Color::BLACK, OPA_50);
        // 255 * 127 / 255 = 127
        assert_eq!(mixed, Color::rgb(127, 127, 127));

        let mixed = Color::mix(Color::rgb(100, 0, 0), Color::rgb(0, 0, 0), 128);
        // 100 * 128 / 255 = 50.19
        assert_eq!(mixed.red, 50);
    }

    #[test_log::test]
    fn darken_moves_toward_black() {
        assert_eq!(Color::WHITE.darken(OPA_COVER), Color::BLACK);
        assert_eq!(Color::WHITE.darken(OPA_TRANSP), Color::WHITE);
    }
}
