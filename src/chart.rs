use std::sync::OnceLock;

use regex::Regex;

use crate::{
    config::Language,
    models::{
        ChartConfig, ChartData, ChartDataset, ChartDescriptor, ChartKind, ChartOptions,
        ChartPlugins, ChartTitle,
    },
};

pub const PALETTE: [&str; 5] = ["#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF"];

// Label first: either separated from the number by whitespace or `:`/`=`,
// or glued to it when the label ends in a non-digit ("apple10").
const LABEL_THEN_NUMBER: &str =
    r"(?:(\w+)(?:\s*[:=]\s*|\s+)|(\w*[^\W\d]))([0-9]+)";
// Number first: the label must contain at least one non-digit word character.
const NUMBER_THEN_LABEL: &str = r"([0-9]+)\s*(\w*[^\W\d]\w*)";

fn digit_groups() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"))
}

fn label_then_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(LABEL_THEN_NUMBER).expect("label pattern is valid"))
}

fn number_then_label() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NUMBER_THEN_LABEL).expect("number pattern is valid"))
}

pub fn count_digit_groups(text: &str) -> usize {
    digit_groups().find_iter(text).count()
}

impl ChartConfig {
    pub fn localized(language: Language) -> Self {
        let strings = language.strings();
        Self {
            title: strings.chart_title.to_owned(),
            x_label: strings.x_label.to_owned(),
            y_label: strings.y_label.to_owned(),
        }
    }
}

/// Picks the chart kind from keywords in the user's own message.
pub fn detect_kind(message: &str) -> ChartKind {
    let lowered = message.to_lowercase();
    if message.contains('선') || lowered.contains("line") {
        ChartKind::Line
    } else if message.contains("파이") || lowered.contains("pie") {
        ChartKind::Pie
    } else {
        ChartKind::Bar
    }
}

/// Label/value pairs in first-seen order; a repeated label keeps its slot and
/// takes the latest value.
pub fn extract_pairs(text: &str) -> Vec<(String, f64)> {
    let mut pairs = Vec::new();
    let mut last_value_end = None;

    for captures in label_then_number().captures_iter(text) {
        let label = captures.get(1).or_else(|| captures.get(2));
        let (Some(label), Some(value)) = (label, captures.get(3)) else {
            continue;
        };
        // "100 매출 200": the label belongs to the number before it.
        if follows_bare_number(text, label.start(), last_value_end) {
            continue;
        }
        insert_pair(&mut pairs, label.as_str(), value.as_str());
        last_value_end = Some(value.end());
    }

    if pairs.is_empty() {
        for captures in number_then_label().captures_iter(text) {
            if let (Some(value), Some(label)) = (captures.get(1), captures.get(2)) {
                insert_pair(&mut pairs, label.as_str(), value.as_str());
            }
        }
    }

    pairs
}

/// True when the label at `label_start` comes right after a standalone digit
/// run that is not the value of the previous accepted pair.
fn follows_bare_number(text: &str, label_start: usize, last_value_end: Option<usize>) -> bool {
    let before = text[..label_start].trim_end();
    let digits_start = before
        .trim_end_matches(|c: char| c.is_ascii_digit())
        .len();
    if digits_start == before.len() {
        return false;
    }
    let glued = before[..digits_start]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');
    !glued && last_value_end != Some(before.len())
}

fn insert_pair(pairs: &mut Vec<(String, f64)>, label: &str, raw_value: &str) {
    let Ok(value) = raw_value.parse::<f64>() else {
        return;
    };
    // Overlong digit runs parse as infinity, which JSON cannot carry.
    let value = value.min(f64::MAX);
    match pairs.iter_mut().find(|(existing, _)| existing == label) {
        Some(slot) => slot.1 = value,
        None => pairs.push((label.to_owned(), value)),
    }
}

/// Builds the chart dataset for `text`, or `None` when nothing was extracted.
pub fn extract_chart_data(text: &str, language: Language) -> Option<ChartData> {
    let pairs = extract_pairs(text);
    if pairs.is_empty() {
        return None;
    }

    let background_color = (0..pairs.len())
        .map(|index| PALETTE[index % PALETTE.len()].to_owned())
        .collect();
    let (labels, data): (Vec<String>, Vec<f64>) = pairs.into_iter().unzip();

    Some(ChartData {
        labels,
        datasets: vec![ChartDataset {
            label: language.strings().dataset_label.to_owned(),
            data,
            background_color,
        }],
    })
}

pub fn generate_chart_config(
    kind: ChartKind,
    data: ChartData,
    config: Option<&ChartConfig>,
    language: Language,
) -> ChartDescriptor {
    let text = config
        .map(|config| config.title.clone())
        .unwrap_or_else(|| language.strings().chart_title.to_owned());

    ChartDescriptor {
        kind,
        data,
        options: ChartOptions {
            responsive: true,
            plugins: ChartPlugins {
                title: ChartTitle {
                    display: true,
                    text,
                },
            },
        },
    }
}
