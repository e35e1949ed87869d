//! # 背景色
//!
//! 展平透明像素时使用的纯色背景，默认白色。
//! 支持 `#rrggbb`、`rrggbb`、`#rgb` 与 `r,g,b` 四种写法，方便命令行与配置文件传入。

use std::fmt;
use std::str::FromStr;

use super::ConvertError;

/// RGB 背景色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackgroundColor(pub [u8; 3]);

impl BackgroundColor {
    pub const WHITE: Self = Self([255, 255, 255]);
    pub const BLACK: Self = Self([0, 0, 0]);

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }

    fn parse_hex(hex: &str) -> Option<[u8; 3]> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some([r, g, b])
            }
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                    let value = digit.to_digit(16)? as u8;
                    *slot = value * 17;
                }
                Some(rgb)
            }
            _ => None,
        }
    }

    fn parse_triple(text: &str) -> Option<[u8; 3]> {
        let mut parts = text.split(',').map(|part| part.trim().parse::<u8>());
        let r = parts.next()?.ok()?;
        let g = parts.next()?.ok()?;
        let b = parts.next()?.ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some([r, g, b])
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[u8; 3]> for BackgroundColor {
    fn from(rgb: [u8; 3]) -> Self {
        Self(rgb)
    }
}

impl From<(u8, u8, u8)> for BackgroundColor {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self([r, g, b])
    }
}

impl FromStr for BackgroundColor {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = if trimmed.contains(',') {
            Self::parse_triple(trimmed)
        } else {
            Self::parse_hex(trimmed.strip_prefix('#').unwrap_or(trimmed))
        };

        parsed.map(Self).ok_or_else(|| {
            ConvertError::InvalidConfig(format!(
                "无法解析背景色：{}（可选：#rrggbb / #rgb / r,g,b）",
                s
            ))
        })
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_white() {
        assert_eq!(BackgroundColor::default(), BackgroundColor::new(255, 255, 255));
    }

    #[test]
    fn parses_supported_notations() {
        assert_eq!("#000000".parse::<BackgroundColor>().ok(), Some(BackgroundColor::BLACK));
        assert_eq!("ff8000".parse::<BackgroundColor>().ok(), Some(BackgroundColor::new(255, 128, 0)));
        assert_eq!("#fff".parse::<BackgroundColor>().ok(), Some(BackgroundColor::WHITE));
        assert_eq!("12, 34 ,56".parse::<BackgroundColor>().ok(), Some(BackgroundColor::new(12, 34, 56)));
    }

    #[test]
    fn rejects_malformed_colors() {
        for input in ["", "#12345", "#gggggg", "1,2", "1,2,3,4", "256,0,0", "-1,0,0", "white"] {
            assert!(
                matches!(input.parse::<BackgroundColor>(), Err(ConvertError::InvalidConfig(_))),
                "should reject {input:?}"
            );
        }
    }

    proptest! {
        #[test]
        fn display_output_parses_back(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let color = BackgroundColor::new(r, g, b);
            let parsed: BackgroundColor = color.to_string().parse().unwrap();
            prop_assert_eq!(parsed, color);
        }

        #[test]
        fn triple_notation_matches_components(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let parsed: BackgroundColor = format!("{r},{g},{b}").parse().unwrap();
            prop_assert_eq!(parsed.rgb(), [r, g, b]);
        }
    }
}
