use std::fmt;

/// Length units accepted in AMP layout attributes. `px` is the default when none is given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Vh,
    Vw,
    Vmin,
    Vmax,
}

impl LengthUnit {
    const ALL: [(&'static str, LengthUnit); 7] = [
        ("vmin", LengthUnit::Vmin),
        ("vmax", LengthUnit::Vmax),
        ("rem", LengthUnit::Rem),
        ("px", LengthUnit::Px),
        ("em", LengthUnit::Em),
        ("vh", LengthUnit::Vh),
        ("vw", LengthUnit::Vw),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LengthUnit::Px => "px",
            LengthUnit::Em => "em",
            LengthUnit::Rem => "rem",
            LengthUnit::Vh => "vh",
            LengthUnit::Vw => "vw",
            LengthUnit::Vmin => "vmin",
            LengthUnit::Vmax => "vmax",
        }
    }
}

/// A CSS length as accepted by AMP layout attributes: `<digits>[.<digits>][unit]`.
///
/// `auto`, `fluid`, signs, exponents and percentages are all rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CssLength {
    pub numeral: f64,
    pub unit: LengthUnit,
}

impl CssLength {
    pub fn parse(value: &str) -> Option<CssLength> {
        let (numeral, rest) = split_numeral(value)?;
        let unit = if rest.is_empty() {
            LengthUnit::Px
        } else {
            LengthUnit::ALL
                .iter()
                .find(|(suffix, _)| *suffix == rest)
                .map(|(_, unit)| *unit)?
        };
        let numeral = numeral.parse::<f64>().ok()?;
        numeral.is_finite().then_some(CssLength { numeral, unit })
    }

    /// Attribute form: the numeral, followed by the unit unless it is `px`.
    pub fn to_attribute_value(&self) -> String {
        match self.unit {
            LengthUnit::Px => format!("{}", self.numeral),
            unit => format!("{}{}", self.numeral, unit.as_str()),
        }
    }
}

impl fmt::Display for CssLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.numeral, self.unit.as_str())
    }
}

/// Split a leading `<digits>[.<digits>]` from `value`, returning it and the remainder.
fn split_numeral(value: &str) -> Option<(&str, &str)> {
    let bytes = value.as_bytes();
    let int_end = bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len());
    if int_end == 0 {
        return None;
    }
    let mut end = int_end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_len = bytes[int_end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if frac_len > 0 {
            end = int_end + 1 + frac_len;
        }
    }
    Some((&value[..end], &value[end..]))
}

/// Parsed `aspect-ratio` value. The numerals are kept as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: String,
    pub height: Option<String>,
}

impl AspectRatio {
    /// Height numeral, `1` when the ratio was written as a single number.
    pub fn height_or_default(&self) -> &str {
        self.height.as_deref().unwrap_or("1")
    }
}

/// Find the first `<num>[ / <num>]` in an `aspect-ratio` value.
///
/// The search is unanchored: `auto 4/3` yields `4/3`. A `/` not followed by a number
/// leaves the height unset.
pub fn parse_aspect_ratio(value: &str) -> Option<AspectRatio> {
    let start = value.find(|c: char| c.is_ascii_digit())?;
    let (width, rest) = split_numeral(&value[start..])?;

    let after_slash = rest
        .trim_start()
        .strip_prefix('/')
        .map(str::trim_start);
    let height = after_slash
        .and_then(split_numeral)
        .map(|(height, _)| height.to_string());

    Some(AspectRatio {
        width: width.to_string(),
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lengths_with_default_px() {
        assert_eq!(
            CssLength::parse("50"),
            Some(CssLength {
                numeral: 50.0,
                unit: LengthUnit::Px
            })
        );
        assert_eq!(CssLength::parse("50px").map(|l| l.to_attribute_value()), Some("50".to_string()));
        assert_eq!(CssLength::parse("1.5em").map(|l| l.to_attribute_value()), Some("1.5em".to_string()));
        assert_eq!(CssLength::parse("20vmin").map(|l| l.unit), Some(LengthUnit::Vmin));
        assert_eq!(CssLength::parse("2.50rem").map(|l| l.to_attribute_value()), Some("2.5rem".to_string()));
    }

    #[test]
    fn rejects_non_layout_lengths() {
        for value in ["auto", "fluid", "50%", "-5px", "5 px", "5PX", "1e3px", ".5px", "5.px", "calc(1px)", ""] {
            assert_eq!(CssLength::parse(value), None, "{value:?} should be rejected");
        }
    }

    #[test]
    fn aspect_ratio_with_and_without_height() {
        assert_eq!(
            parse_aspect_ratio("16/9"),
            Some(AspectRatio {
                width: "16".to_string(),
                height: Some("9".to_string())
            })
        );
        let ratio = parse_aspect_ratio("1.5").expect("ratio");
        assert_eq!(ratio.width, "1.5");
        assert_eq!(ratio.height_or_default(), "1");
        let spaced = parse_aspect_ratio("auto 4 / 3").expect("ratio");
        assert_eq!((spaced.width.as_str(), spaced.height_or_default()), ("4", "3"));
    }

    #[test]
    fn aspect_ratio_without_numbers_is_none() {
        assert_eq!(parse_aspect_ratio("auto"), None);
        assert_eq!(parse_aspect_ratio("16 / x").map(|r| r.height), Some(None));
    }
}
