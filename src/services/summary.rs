use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// The three labeled sections extracted from a model completion. A
/// section whose heading never appears is an empty string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiSummary {
    pub insights: String,
    pub predictions: String,
    pub motivational: String,
}

// each rule captures from right after its heading up to the next
// `###` heading or the end of the text, independently of the others
static INSIGHTS_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)###\s*Spending Insights:\s*(.*?)(?:\n###|\z)").expect("insights rule")
});

static PREDICTIONS_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)###\s*Predictions for Next Month:\s*(.*?)(?:\n###|\z)")
        .expect("predictions rule")
});

// the motivational section tolerates a quote wrapped around the text
static MOTIVATIONAL_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)###\s*Motivational Message:\s*["']?(.*?)(?:["']|\n###|\z)"#)
        .expect("motivational rule")
});

/// Splits a free-text model completion into its labeled sections.
/// Model output is unstructured, so this degrades instead of failing:
/// missing headings resolve to empty fields.
pub fn sectionize(text: &str) -> AiSummary {
    let clean = text.replace('\r', "");

    AiSummary {
        insights: capture(&INSIGHTS_SECTION, &clean),
        predictions: capture(&PREDICTIONS_SECTION, &clean),
        motivational: capture(&MOTIVATIONAL_SECTION, &clean),
    }
}

fn capture(rule: &Regex, text: &str) -> String {
    rule.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|section| clean_section(section.as_str()))
        .unwrap_or_default()
}

// models like to wrap sections in quotes and leave dangling commas
fn clean_section(section: &str) -> String {
    let section = section.trim();
    let section = section.strip_prefix(['"', '\'']).unwrap_or(section);
    let section = section.strip_suffix(['"', '\'']).unwrap_or(section);

    strip_trailing_comma(section).to_owned()
}

fn strip_trailing_comma(section: &str) -> &str {
    let trimmed = section.trim_end();

    match trimmed.strip_suffix(',') {
        Some(rest) => rest,
        None => section,
    }
}

/// Line-level cleanup for rendering insight bullets: blank lines drop,
/// markdown emphasis markers drop, a leading run of dashes drops.
pub fn insight_lines(section: &str) -> Vec<String> {
    section
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let line = line.replace("**", "");
            strip_bullets(&line).to_owned()
        })
        .collect()
}

/// Prediction lines only ever carry a plain `- ` bullet.
pub fn prediction_lines(section: &str) -> Vec<String> {
    section
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.strip_prefix("- ").unwrap_or(line).to_owned())
        .collect()
}

fn strip_bullets(line: &str) -> &str {
    let rest = line.trim_start_matches('-');

    if rest.len() == line.len() {
        line
    } else {
        rest.trim_start()
    }
}

#[cfg(test)]
mod test {
    use super::{insight_lines, prediction_lines, sectionize};

    #[test]
    fn text_without_headings_yields_all_empty_sections() {
        let summary = sectionize("the model rambled about something else entirely");

        assert_eq!(summary.insights, "");
        assert_eq!(summary.predictions, "");
        assert_eq!(summary.motivational, "");
    }

    #[test]
    fn empty_input_yields_all_empty_sections() {
        let summary = sectionize("");

        assert_eq!(summary.insights, "");
        assert_eq!(summary.predictions, "");
        assert_eq!(summary.motivational, "");
    }

    #[test]
    fn sections_are_bounded_by_the_next_heading() {
        let summary = sectionize("### Spending Insights:\nFoo\n### Predictions for Next Month:\nBar");

        assert_eq!(summary.insights, "Foo");
        assert_eq!(summary.predictions, "Bar");
        assert_eq!(summary.motivational, "");
    }

    #[test]
    fn headings_match_case_insensitively() {
        let summary = sectionize("### spending insights:\nless coffee\n### MOTIVATIONAL MESSAGE:\nonward");

        assert_eq!(summary.insights, "less coffee");
        assert_eq!(summary.motivational, "onward");
    }

    #[test]
    fn heading_order_in_the_text_does_not_matter() {
        let text = "### Motivational Message:\nkeep at it\n### Spending Insights:\ngroceries up 12%";

        let summary = sectionize(text);

        assert_eq!(summary.insights, "groceries up 12%");
        assert_eq!(summary.motivational, "keep at it");
    }

    #[test]
    fn carriage_returns_are_stripped() {
        let summary = sectionize("### Spending Insights:\r\nFoo\r\n### Predictions for Next Month:\r\nBar");

        assert_eq!(summary.insights, "Foo");
        assert_eq!(summary.predictions, "Bar");
    }

    #[test]
    fn motivational_section_sheds_its_quotes() {
        let summary = sectionize("### Motivational Message: \"Small steps add up!\"");

        assert_eq!(summary.motivational, "Small steps add up!");
    }

    #[test]
    fn surrounding_quotes_are_stripped_once() {
        let summary = sectionize("### Spending Insights:\n\"dining out doubled\"");

        assert_eq!(summary.insights, "dining out doubled");
    }

    #[test]
    fn trailing_commas_are_stripped() {
        let summary = sectionize("### Predictions for Next Month:\nsteady, ");

        assert_eq!(summary.predictions, "steady");
    }

    #[test]
    fn multiline_sections_keep_their_interior_newlines() {
        let text = "### Spending Insights:\n- groceries up\n- transport down\n### Predictions for Next Month:\nquiet month";

        let summary = sectionize(text);

        assert_eq!(summary.insights, "- groceries up\n- transport down");
    }

    #[test]
    fn insight_lines_drop_bullets_emphasis_and_blanks() {
        let lines = insight_lines("**Groceries** rose sharply\n\n-- transport flat\n- dining out doubled");

        assert_eq!(
            lines,
            vec![
                "Groceries rose sharply".to_owned(),
                "transport flat".to_owned(),
                "dining out doubled".to_owned(),
            ]
        );
    }

    #[test]
    fn prediction_lines_only_shed_a_plain_bullet() {
        let lines = prediction_lines("- spending should dip\nrent stays fixed\n");

        assert_eq!(
            lines,
            vec!["spending should dip".to_owned(), "rent stays fixed".to_owned()]
        );
    }
}
