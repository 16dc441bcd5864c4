//! Colors, dash patterns and edge clipping

use crate::layout::Point;

/// A `0xRRGGBBAA` color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u32);

impl Rgba {
    pub fn alpha(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// `#rrggbb`
    pub fn hex(self) -> String {
        format!("#{:06x}", self.0 >> 8)
    }

    /// Opacity in `0.0..=1.0`, `None` when fully opaque
    pub fn opacity(self) -> Option<f64> {
        match self.alpha() {
            0xff => None,
            a => Some(f64::from(a) / 255.0),
        }
    }

    /// `name="#rrggbb"` plus `name-opacity` when the color is translucent
    pub fn attrs(self, name: &str) -> String {
        let mut out = format!(r#" {}="{}""#, name, self.hex());
        if let Some(opacity) = self.opacity() {
            out.push_str(&format!(r#" {}-opacity="{}""#, name, fmt_num(opacity)));
        }
        out
    }
}

/// A parsed dash pattern
#[derive(Debug, Clone, PartialEq)]
pub struct Dash {
    pub lengths: Vec<f64>,
    pub offset: f64,
}

/// Parse a dash string such as `"4 2"` or `6|3|2`
///
/// Numbers are separated by spaces, tabs, quotes, `;`, `,`, `|` or `:` and
/// must lie in `1..=255`. Parsing stops at the first invalid number; fewer
/// than two valid numbers means no dash. The last number doubles as the
/// dash offset.
pub fn parse_dash(text: &str) -> Option<Dash> {
    let lengths: Vec<f64> = text
        .split(|c: char| matches!(c, ' ' | '\t' | '"' | ';' | ',' | '|' | ':'))
        .filter(|part| !part.is_empty())
        .map_while(dash_value)
        .collect();
    if lengths.len() < 2 {
        return None;
    }
    let offset = lengths.last().copied().unwrap_or_default();
    Some(Dash { lengths, offset })
}

fn dash_value(part: &str) -> Option<f64> {
    let value = match part.strip_prefix("0x").or_else(|| part.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => part.parse::<u32>().ok()?,
    };
    (1..=0xff).contains(&value).then(|| f64::from(value))
}

/// The part of the parent-child edge outside both circles
///
/// Returns `(child end, parent end)`, or `None` when the edge is vertical,
/// points upwards, or is too short to show.
pub fn clip_edge(child: Point, parent: Point, radius: f64) -> Option<(Point, Point)> {
    if child.x == parent.x || parent.y >= child.y || radius == 0.0 {
        return None;
    }
    if child.distance(&parent) <= 2.0 * radius {
        return None;
    }

    let angle = (child.y - parent.y).abs().atan2((child.x - parent.x).abs());
    let dx = radius * angle.cos();
    let dy = radius * angle.sin();
    let (child_x, parent_x) = if child.x < parent.x {
        (child.x + dx, parent.x - dx)
    } else {
        (child.x - dx, parent.x + dx)
    };
    Some((
        Point::new(child_x, child.y - dy),
        Point::new(parent_x, parent.y + dy),
    ))
}

/// Format a coordinate with at most two decimals
pub fn fmt_num(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba() {
        let color = Rgba(0x00ff_00ff);
        assert_eq!(color.hex(), "#00ff00");
        assert_eq!(color.opacity(), None);
        assert_eq!(color.attrs("fill"), r##" fill="#00ff00""##);

        let faint = Rgba(32);
        assert_eq!(faint.hex(), "#000000");
        assert_eq!(
            faint.attrs("fill"),
            r##" fill="#000000" fill-opacity="0.13""##
        );
    }

    #[test]
    fn test_parse_dash() {
        assert_eq!(
            parse_dash("4 2"),
            Some(Dash {
                lengths: vec![4.0, 2.0],
                offset: 2.0
            })
        );
        assert_eq!(parse_dash("\"6|3:0x10\"").map(|d| d.lengths), Some(vec![6.0, 3.0, 16.0]));
        assert_eq!(parse_dash("5"), None);
        assert_eq!(parse_dash(""), None);
        assert_eq!(parse_dash("0 4"), None);
        assert_eq!(parse_dash("4 300 2").map(|d| d.lengths), None);
        assert_eq!(parse_dash("4 2 x 7").map(|d| d.lengths), Some(vec![4.0, 2.0]));
    }

    #[test]
    fn test_clip_edge() {
        let parent = Point::new(30.0, 0.0);
        let child = Point::new(0.0, 40.0);
        let (c, p) = clip_edge(child, parent, 5.0).unwrap();
        assert!((c.distance(&child) - 5.0).abs() < 1e-9);
        assert!((p.distance(&parent) - 5.0).abs() < 1e-9);
        assert!(c.x > child.x && p.x < parent.x);
        assert!(c.y < child.y && p.y > parent.y);
    }

    #[test]
    fn test_clip_edge_skips() {
        let parent = Point::new(0.0, 0.0);
        assert!(clip_edge(Point::new(0.0, 50.0), parent, 5.0).is_none());
        assert!(clip_edge(Point::new(10.0, -5.0), parent, 5.0).is_none());
        assert!(clip_edge(Point::new(6.0, 6.0), parent, 5.0).is_none());
        assert!(clip_edge(Point::new(30.0, 30.0), parent, 0.0).is_none());
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(15.5), "15.5");
        assert_eq!(fmt_num(66.0), "66");
        assert_eq!(fmt_num(23.186), "23.19");
        assert_eq!(fmt_num(-0.001), "0");
    }
}
