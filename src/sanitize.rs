use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

pub const CONTACT_LINE: &str = "Please contact Dept. of Industries Govt of Jharkhand";

lazy_static! {
    static ref GENERIC_DISCLAIMER: Regex = RegexBuilder::new(
        r"Please refer to the official policy document or contact the relevant authorities for precise rebate figures\.?",
    )
    .case_insensitive(true)
    .build()
    .unwrap();
}

/// Make answer text display-ready.
///
/// Strips `*` emphasis markup, swaps the model's stock "contact the relevant
/// authorities" disclaimer for the department's contact line, and trims.
/// Applying it twice gives the same result as applying it once.
pub fn sanitize(text: &str) -> String {
    let stripped = text.replace('*', "");
    GENERIC_DISCLAIMER
        .replace_all(&stripped, CONTACT_LINE)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISCLAIMER: &str = "Please refer to the official policy document or contact the relevant authorities for precise rebate figures.";

    #[test]
    fn test_strips_emphasis() {
        assert_eq!(sanitize("**Road tax** is *waived*"), "Road tax is waived");
    }

    #[test]
    fn test_rewrites_disclaimer() {
        let input = format!("Subsidy is Rs 5,000. {DISCLAIMER}");
        assert_eq!(sanitize(&input), format!("Subsidy is Rs 5,000. {CONTACT_LINE}"));
    }

    #[test]
    fn test_rewrites_disclaimer_case_insensitive_without_period() {
        let input = "PLEASE REFER TO THE OFFICIAL POLICY DOCUMENT OR CONTACT THE RELEVANT AUTHORITIES FOR PRECISE REBATE FIGURES";
        assert_eq!(sanitize(input), CONTACT_LINE);
    }

    #[test]
    fn test_rewrites_every_disclaimer() {
        let input = format!("{DISCLAIMER}\n{DISCLAIMER}");
        assert_eq!(sanitize(&input), format!("{CONTACT_LINE}\n{CONTACT_LINE}"));
    }

    #[test]
    fn test_emphasis_inside_disclaimer() {
        let input = "Please refer to the **official** policy document or contact the relevant authorities for precise rebate figures.";
        assert_eq!(sanitize(input), CONTACT_LINE);
    }

    #[test]
    fn test_trims() {
        assert_eq!(sanitize("  \n hello *\n"), "hello");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "plain text",
            "** bold ** and *italic*",
            " * leading star",
            DISCLAIMER,
            "Please refer to the official policy document or contact the relevant authorities for precise rebate figures..",
            "text before. please refer to the official policy document or contact the relevant authorities for precise rebate figures. after",
            "Please refer to the official policy document or contact the relevant *authorities for precise rebate figures",
        ];
        for sample in samples {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
