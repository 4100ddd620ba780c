//! WMO 天气代码 → 可读描述

/// 将 Open-Meteo 返回的 WMO 天气代码转换为英文描述，未知代码返回 `"Unknown"`
pub fn describe(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [i32; 24] = [
        0, 1, 2, 3, 45, 48, 51, 53, 55, 61, 63, 65, 71, 73, 75, 77, 80, 81, 82, 85, 86, 95, 96,
        99,
    ];

    #[test]
    fn test_known_codes() {
        assert_eq!(describe(0), "Clear sky");
        assert_eq!(describe(61), "Slight rain");
        assert_eq!(describe(99), "Thunderstorm with heavy hail");
    }

    #[test]
    fn test_total_over_code_range() {
        for code in 0..=99 {
            let label = describe(code);
            if KNOWN.contains(&code) {
                assert_ne!(label, "Unknown", "代码 {} 应该有描述", code);
            } else {
                assert_eq!(label, "Unknown", "代码 {} 不在表中", code);
            }
        }
        assert_eq!(describe(-1), "Unknown");
        assert_eq!(describe(1000), "Unknown");
    }
}
