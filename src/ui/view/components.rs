//! 通用 UI 组件
//!
//! 信标条目的文本模板与配色样式查表

use ratatui::style::{Color, Style};

use crate::models::{Beacon, BeaconColor};

/// [组件] 信标列表行
///
/// 纯字符串模板：UUID、major/minor、距离分级与估算距离
pub fn beacon_list_line(beacon: &Beacon) -> String {
    format!(
        "{}  {:>5}/{:<5}  {:>9}  {:>6.2}m",
        beacon.proximity_uuid, beacon.major, beacon.minor, beacon.proximity, beacon.distance
    )
}

/// [组件] 信标外壳配色对应的列表样式
pub fn beacon_color_style(color: BeaconColor) -> Style {
    let fg = match color {
        BeaconColor::IcyMarshmallow => Color::Cyan,
        BeaconColor::BlueberryPie => Color::Blue,
        BeaconColor::MintCocktail => Color::Green,
        BeaconColor::LemonTart => Color::Yellow,
        BeaconColor::CandyFloss => Color::LightMagenta,
        BeaconColor::SweetBeetroot => Color::Red,
        BeaconColor::VanillaJar => Color::LightYellow,
        BeaconColor::LiquoriceSwirl => Color::DarkGray,
        BeaconColor::White => Color::White,
        BeaconColor::Transparent | BeaconColor::Unknown => Color::Gray,
    };
    Style::default().fg(fg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawBeacon;

    #[test]
    fn test_list_line_contains_fields_verbatim() {
        let beacon = Beacon::from_raw(RawBeacon {
            proximity_uuid: Some("b9407f30-f5f8-466e-aff9-25556b57fe6d".to_string()),
            major: Some(1001),
            minor: Some(7),
            proximity: Some("immediate".to_string()),
            color: Some("lemon_tart".to_string()),
            distance: Some(0.42),
            mac_address: None,
            rssi: None,
        })
        .unwrap();

        let line = beacon_list_line(&beacon);
        assert!(line.contains("b9407f30-f5f8-466e-aff9-25556b57fe6d"));
        assert!(line.contains("1001"));
        assert!(line.contains('7'));
        assert!(line.contains("immediate"));
        assert!(line.contains("0.42"));
    }

    #[test]
    fn test_color_style_lookup() {
        assert_eq!(
            beacon_color_style(BeaconColor::MintCocktail).fg,
            Some(Color::Green)
        );
        assert_eq!(
            beacon_color_style(BeaconColor::Unknown).fg,
            Some(Color::Gray)
        );
    }
}
