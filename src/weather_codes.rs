//! Weather code translation
//!
//! MET reports textual symbol codes (`lightrainshowers_day`), Open-Meteo
//! reports numeric WMO codes (`61`). Both are mapped here into a
//! [`WeatherPresentation`]: a Norwegian description plus a MET-style symbol
//! key, which is the single vocabulary the icon lookup understands.
//!
//! The keyword tables are evaluated top to bottom and the first rule whose
//! keyword occurs in the (lowercased) symbol code wins.

use serde::{Deserialize, Serialize};

/// Description used for codes no rule or table entry recognizes
pub const UNKNOWN_DESCRIPTION: &str = "Ukjent";

/// Icon used for symbol codes no icon rule recognizes
pub const DEFAULT_ICON: &str = "🌡️";

/// Symbol key used when a day carries no symbol at all, or an unknown WMO code
pub const FALLBACK_SYMBOL: &str = "cloudy";

/// A keyword rule: any of `keywords` as a substring selects `value`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordRule {
    pub keywords: &'static [&'static str],
    pub value: &'static str,
}

impl KeywordRule {
    const fn new(keywords: &'static [&'static str], value: &'static str) -> Self {
        Self { keywords, value }
    }

    fn matches(&self, code: &str) -> bool {
        self.keywords.iter().any(|keyword| code.contains(keyword))
    }
}

/// Symbol code -> description, in evaluation order.
///
/// `cloudy` is checked before `partlycloudy`, so partly cloudy codes read as
/// "Overskyet". The yr tables have always shown them that way.
pub const SYMBOL_DESCRIPTION_RULES: &[KeywordRule] = &[
    KeywordRule::new(&["thunder"], "Tordenvær"),
    KeywordRule::new(&["heavysnow"], "Kraftig snø"),
    KeywordRule::new(&["snow"], "Snø"),
    KeywordRule::new(&["sleet"], "Sludd"),
    KeywordRule::new(&["heavyrain"], "Kraftig regn"),
    KeywordRule::new(&["rain"], "Regn"),
    KeywordRule::new(&["fog"], "Tåke"),
    KeywordRule::new(&["cloudy"], "Overskyet"),
    KeywordRule::new(&["partlycloudy"], "Delvis skyet"),
    KeywordRule::new(&["clearsky"], "Klarvær"),
    KeywordRule::new(&["fair"], "Lettskyet"),
];

/// Symbol code -> icon, in evaluation order
pub const SYMBOL_ICON_RULES: &[KeywordRule] = &[
    KeywordRule::new(&["thunder"], "⛈️"),
    KeywordRule::new(&["snow"], "❄️"),
    KeywordRule::new(&["sleet"], "🌨️"),
    KeywordRule::new(&["rain"], "🌧️"),
    KeywordRule::new(&["fog"], "🌫️"),
    KeywordRule::new(&["cloudy"], "☁️"),
    KeywordRule::new(&["partlycloudy"], "⛅"),
    KeywordRule::new(&["clearsky", "fair"], "☀️"),
];

/// The 28 WMO codes Open-Meteo reports, with their descriptions
pub const WMO_DESCRIPTIONS: [(u16, &str); 28] = [
    (0, "Klar"),
    (1, "For det meste klart"),
    (2, "Delvis skyet"),
    (3, "Overskyet"),
    (45, "Tåke"),
    (48, "Rimtåke"),
    (51, "Lett yr"),
    (53, "Moderat yr"),
    (55, "Kraftig yr"),
    (56, "Frysende yr"),
    (57, "Kraftig frysende yr"),
    (61, "Lett regn"),
    (63, "Regn"),
    (65, "Kraftig regn"),
    (66, "Underkjølt regn"),
    (67, "Kraftig underkjølt regn"),
    (71, "Lett snø"),
    (73, "Snø"),
    (75, "Kraftig snø"),
    (77, "Snøkorn"),
    (80, "Lette regnbyger"),
    (81, "Regnbyger"),
    (82, "Kraftige regnbyger"),
    (85, "Lette snøbyger"),
    (86, "Kraftige snøbyger"),
    (95, "Tordenvær"),
    (96, "Tordenvær med hagl"),
    (99, "Kraftig tordenvær med hagl"),
];

/// Description and shared symbol key for one forecast day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherPresentation {
    pub description: String,
    pub icon_symbol: String,
}

impl WeatherPresentation {
    /// Presentation for a MET symbol code; a missing code maps to unknown/cloudy
    #[must_use]
    pub fn from_symbol(symbol_code: Option<&str>) -> Self {
        let symbol_code = symbol_code.filter(|code| !code.is_empty());
        Self {
            description: describe_symbol(symbol_code.unwrap_or_default()).to_string(),
            icon_symbol: symbol_code.unwrap_or(FALLBACK_SYMBOL).to_string(),
        }
    }

    /// Presentation for a WMO code; a missing code is treated as unknown
    #[must_use]
    pub fn from_wmo(code: Option<u16>) -> Self {
        match code {
            Some(code) => Self {
                description: describe_wmo(code).to_string(),
                icon_symbol: wmo_to_symbol(code).to_string(),
            },
            None => Self {
                description: UNKNOWN_DESCRIPTION.to_string(),
                icon_symbol: FALLBACK_SYMBOL.to_string(),
            },
        }
    }
}

fn first_match(rules: &[KeywordRule], symbol_code: &str) -> Option<&'static str> {
    let code = symbol_code.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&code))
        .map(|rule| rule.value)
}

/// Description for a MET symbol code
#[must_use]
pub fn describe_symbol(symbol_code: &str) -> &'static str {
    first_match(SYMBOL_DESCRIPTION_RULES, symbol_code).unwrap_or(UNKNOWN_DESCRIPTION)
}

/// Icon for a MET-style symbol key
#[must_use]
pub fn icon_for_symbol(symbol_code: &str) -> &'static str {
    first_match(SYMBOL_ICON_RULES, symbol_code).unwrap_or(DEFAULT_ICON)
}

/// Description for a WMO weather code
#[must_use]
pub fn describe_wmo(code: u16) -> &'static str {
    WMO_DESCRIPTIONS
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(UNKNOWN_DESCRIPTION, |&(_, description)| description)
}

/// Equivalent MET symbol key for a WMO code.
///
/// Many-to-one: drizzle collapses into `lightrain`, hail into
/// `heavysleetandthunder`, and so on.
#[must_use]
pub const fn wmo_to_symbol(code: u16) -> &'static str {
    match code {
        0 => "clearsky_day",
        1 => "fair_day",
        2 => "partlycloudy_day",
        3 => "cloudy",
        45 | 48 => "fog",
        51 | 53 | 55 | 61 => "lightrain",
        56 | 57 => "sleet",
        63 => "rain",
        65..=67 => "heavyrain",
        71 => "lightsnow",
        73 | 77 => "snow",
        75 => "heavysnow",
        80 => "rainshowers_day",
        81 | 82 => "heavyrainshowers_day",
        85 | 86 => "snowshowers_day",
        95 => "thunderstorm",
        96 | 99 => "heavysleetandthunder",
        _ => FALLBACK_SYMBOL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rainandthunder", "Tordenvær")]
    #[case("heavysnowshowers_night", "Kraftig snø")]
    #[case("lightsnow", "Snø")]
    #[case("lightsleetshowers_day", "Sludd")]
    #[case("heavyrain", "Kraftig regn")]
    #[case("lightrainshowers_day", "Regn")]
    #[case("fog", "Tåke")]
    #[case("partlycloudy_night", "Overskyet")]
    #[case("cloudy", "Overskyet")]
    #[case("clearsky_day", "Klarvær")]
    #[case("fair_polartwilight", "Lettskyet")]
    #[case("ClearSky_Day", "Klarvær")]
    #[case("", "Ukjent")]
    #[case("volcano", "Ukjent")]
    fn test_describe_symbol(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(describe_symbol(code), expected);
    }

    #[rstest]
    #[case("heavyrainandthunder", "⛈️")]
    #[case("snowshowers_day", "❄️")]
    #[case("sleet", "🌨️")]
    #[case("rain", "🌧️")]
    #[case("fog", "🌫️")]
    #[case("partlycloudy_day", "☁️")]
    #[case("cloudy", "☁️")]
    #[case("clearsky_night", "☀️")]
    #[case("fair_day", "☀️")]
    #[case("", "🌡️")]
    fn test_icon_for_symbol(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(icon_for_symbol(code), expected);
    }

    #[test]
    fn test_cloudy_rule_wins_over_partlycloudy() {
        assert_eq!(describe_symbol("partlycloudy_day"), "Overskyet");
        assert_eq!(icon_for_symbol("partlycloudy_day"), "☁️");
        assert_eq!(icon_for_symbol(wmo_to_symbol(2)), "☁️");
    }

    #[test]
    fn test_rule_order() {
        let descriptions: Vec<&str> = SYMBOL_DESCRIPTION_RULES
            .iter()
            .map(|rule| rule.keywords[0])
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "thunder",
                "heavysnow",
                "snow",
                "sleet",
                "heavyrain",
                "rain",
                "fog",
                "cloudy",
                "partlycloudy",
                "clearsky",
                "fair"
            ]
        );

        let icons: Vec<&str> = SYMBOL_ICON_RULES
            .iter()
            .map(|rule| rule.keywords[0])
            .collect();
        assert_eq!(
            icons,
            vec!["thunder", "snow", "sleet", "rain", "fog", "cloudy", "partlycloudy", "clearsky"]
        );
    }

    #[test]
    fn test_wmo_table_is_complete() {
        for (code, description) in WMO_DESCRIPTIONS {
            assert_eq!(describe_wmo(code), description);
            assert_ne!(description, UNKNOWN_DESCRIPTION);
        }
    }

    #[test]
    fn test_wmo_clear_sky_is_sunny() {
        let presentation = WeatherPresentation::from_wmo(Some(0));
        assert_eq!(presentation.description, "Klar");
        assert_eq!(presentation.icon_symbol, "clearsky_day");
        assert_eq!(icon_for_symbol(&presentation.icon_symbol), "☀️");
    }

    #[test]
    fn test_unknown_wmo_code() {
        let presentation = WeatherPresentation::from_wmo(Some(999));
        assert_eq!(presentation.description, UNKNOWN_DESCRIPTION);
        assert_eq!(presentation.icon_symbol, FALLBACK_SYMBOL);
        assert_eq!(WeatherPresentation::from_wmo(None), presentation);
    }

    #[rstest]
    #[case(1, "fair_day")]
    #[case(53, "lightrain")]
    #[case(57, "sleet")]
    #[case(61, "lightrain")]
    #[case(66, "heavyrain")]
    #[case(77, "snow")]
    #[case(82, "heavyrainshowers_day")]
    #[case(95, "thunderstorm")]
    #[case(99, "heavysleetandthunder")]
    fn test_wmo_to_symbol(#[case] code: u16, #[case] expected: &str) {
        assert_eq!(wmo_to_symbol(code), expected);
    }

    #[test]
    fn test_bridged_symbols_stay_in_icon_vocabulary() {
        for (code, _) in WMO_DESCRIPTIONS {
            assert_ne!(icon_for_symbol(wmo_to_symbol(code)), DEFAULT_ICON, "code {code}");
        }
    }

    #[test]
    fn test_missing_symbol_presentation() {
        let presentation = WeatherPresentation::from_symbol(None);
        assert_eq!(presentation.description, UNKNOWN_DESCRIPTION);
        assert_eq!(presentation.icon_symbol, FALLBACK_SYMBOL);
        assert_eq!(WeatherPresentation::from_symbol(Some("")), presentation);

        let presentation = WeatherPresentation::from_symbol(Some("lightrain"));
        assert_eq!(presentation.description, "Regn");
        assert_eq!(presentation.icon_symbol, "lightrain");
    }
}
