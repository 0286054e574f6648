//! Localized month abbreviation tables.

/// Language of the month abbreviations used in period column labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// `Jan Fev Mar Abr Mai Jun Jul Ago Set Out Nov Dez`.
    #[default]
    Portuguese,
    /// `Jan Feb Mar Apr May Jun Jul Aug Sep Oct Nov Dec`.
    English,
}

const PORTUGUESE: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

const ENGLISH: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl Locale {
    fn table(self) -> &'static [&'static str; 12] {
        match self {
            Locale::Portuguese => &PORTUGUESE,
            Locale::English => &ENGLISH,
        }
    }

    /// Translate an abbreviation into a month number (1-12).
    ///
    /// Matching ignores ASCII case and surrounding whitespace. Anything not in
    /// the table yields `None`; there is no pass-through.
    pub fn month_number(self, abbreviation: &str) -> Option<u32> {
        let abbreviation = abbreviation.trim();
        self.table()
            .iter()
            .position(|m| m.eq_ignore_ascii_case(abbreviation))
            .map(|i| i as u32 + 1)
    }

    /// Abbreviation for a month number (1-12).
    pub fn abbreviation(self, month: u32) -> Option<&'static str> {
        if (1..=12).contains(&month) {
            Some(self.table()[month as usize - 1])
        } else {
            None
        }
    }
}
