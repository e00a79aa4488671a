use crate::gui::Color;

/// A color in the GDI `COLORREF` layout, `0x00BBGGRR`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ColorRef {
    value: u32,
}

impl ColorRef {
    pub const fn rgb(r: u8, g: u8, b: u8) -> ColorRef {
        ColorRef {
            value: (r as u32) | ((g as u32) << 8) | ((b as u32) << 16),
        }
    }

    pub const fn from_raw(value: u32) -> ColorRef {
        ColorRef {
            value: value & 0x00ff_ffff,
        }
    }

    pub const fn red(&self) -> u8 {
        self.value as u8
    }

    pub const fn green(&self) -> u8 {
        (self.value >> 8) as u8
    }

    pub const fn blue(&self) -> u8 {
        (self.value >> 16) as u8
    }
}

impl From<ColorRef> for u32 {
    fn from(color: ColorRef) -> Self {
        color.value
    }
}

impl From<Color> for ColorRef {
    fn from(color: Color) -> Self {
        ColorRef::rgb(color.red, color.green, color.blue)
    }
}

impl From<ColorRef> for Color {
    fn from(color: ColorRef) -> Self {
        Color::rgb(color.red(), color.green(), color.blue())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn channels_are_packed_blue_green_red() {
        let color = ColorRef::rgb(0x12, 0x34, 0x56);
        assert_eq!(u32::from(color), 0x0056_3412);
        assert_eq!((color.red(), color.green(), color.blue()), (0x12, 0x34, 0x56));
    }

    #[test_log::test]
    fn converts_from_core_color() {
        let color = ColorRef::from(Color::RED);
        assert_eq!(u32::from(color), 0x0000_00ff);
        assert_eq!(Color::from(color), Color::RED);
    }

    #[test_log::test]
    fn raw_values_drop_the_high_byte() {
        assert_eq!(u32::from(ColorRef::from_raw(0xff00_00ff)), 0x0000_00ff);
    }
}
