/// Dialing rules for a country: E.164 country code and the accepted length range of the
/// national significant number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryDialing {
    pub iso: &'static str,
    pub name: &'static str,
    pub dial_code: &'static str,
    pub min_len: usize,
    pub max_len: usize,
}

const fn country(
    iso: &'static str,
    name: &'static str,
    dial_code: &'static str,
    min_len: usize,
    max_len: usize,
) -> CountryDialing {
    CountryDialing {
        iso,
        name,
        dial_code,
        min_len,
        max_len,
    }
}

pub static COUNTRIES: &[CountryDialing] = &[
    country("AE", "United Arab Emirates", "971", 8, 9),
    country("AR", "Argentina", "54", 10, 11),
    country("AT", "Austria", "43", 4, 13),
    country("AU", "Australia", "61", 9, 9),
    country("BE", "Belgium", "32", 8, 9),
    country("BR", "Brazil", "55", 10, 11),
    country("CA", "Canada", "1", 10, 10),
    country("CH", "Switzerland", "41", 9, 9),
    country("CN", "China", "86", 11, 11),
    country("DE", "Germany", "49", 6, 11),
    country("DK", "Denmark", "45", 8, 8),
    country("EG", "Egypt", "20", 10, 10),
    country("ES", "Spain", "34", 9, 9),
    country("FI", "Finland", "358", 5, 12),
    country("FR", "France", "33", 9, 9),
    country("GB", "United Kingdom", "44", 10, 10),
    country("IE", "Ireland", "353", 7, 9),
    country("IN", "India", "91", 10, 10),
    country("IT", "Italy", "39", 6, 11),
    country("JP", "Japan", "81", 9, 10),
    country("KE", "Kenya", "254", 9, 9),
    country("KR", "South Korea", "82", 9, 10),
    country("MX", "Mexico", "52", 10, 10),
    country("NG", "Nigeria", "234", 8, 10),
    country("NL", "Netherlands", "31", 9, 9),
    country("NO", "Norway", "47", 8, 8),
    country("NZ", "New Zealand", "64", 8, 10),
    country("PH", "Philippines", "63", 10, 10),
    country("PK", "Pakistan", "92", 10, 10),
    country("PL", "Poland", "48", 9, 9),
    country("PT", "Portugal", "351", 9, 9),
    country("SA", "Saudi Arabia", "966", 9, 9),
    country("SE", "Sweden", "46", 7, 9),
    country("SG", "Singapore", "65", 8, 8),
    country("TR", "Turkey", "90", 10, 10),
    country("UA", "Ukraine", "380", 9, 9),
    country("US", "United States", "1", 10, 10),
    country("ZA", "South Africa", "27", 9, 9),
];

/// Case-insensitive lookup by ISO 3166-1 alpha-2 code.
pub fn find_country(iso: &str) -> Option<&'static CountryDialing> {
    COUNTRIES.iter().find(|c| c.iso.eq_ignore_ascii_case(iso))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn iso_codes_are_unique_and_sorted() {
        for pair in COUNTRIES.windows(2) {
            assert!(pair[0].iso < pair[1].iso, "{} >= {}", pair[0].iso, pair[1].iso);
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(find_country("de").map(|c| c.dial_code), Some("49"));
        assert!(find_country("XX").is_none());
    }
}
