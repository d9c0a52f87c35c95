//! Broadcast titles and descriptions.

use crate::mass::{Mass, Reading, Section};
use jiff::Zoned;

/// Largest description the broadcast API accepts, in bytes.
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;

/// Largest title the broadcast API accepts, in characters.
pub const MAX_TITLE_LENGTH: usize = 100;

pub const PREAMBLE: &str = "Please consider giving this video a like and subscribing to the channel. \
Thanks for watching and see you all next week. Please share this video with family and friends.";

/// How much of the readings a description carries, from most to least.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    /// Every reading of every section, with its text.
    Full,
    /// The first reading of each section, with its text.
    FirstReading,
    /// One `header: citation` line per section.
    Headers,
    /// No readings at all.
    Bare,
}

impl Detail {
    pub const ALL: [Detail; 4] = [
        Detail::Full,
        Detail::FirstReading,
        Detail::Headers,
        Detail::Bare,
    ];
}

/// Title for the Mass celebrated at `when`, e.g. `Mass March 16, 2024 - 5:30 PM`.
///
/// The liturgical title is appended when the result still fits the API's limit.
pub fn generate_title(when: &Zoned, mass_title: Option<&str>) -> String {
    let title = format!("Mass {}", when.strftime("%B %d, %Y - %-I:%M %p"));
    match mass_title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(extra) if title.chars().count() + 3 + extra.chars().count() <= MAX_TITLE_LENGTH => {
            format!("{title} - {extra}")
        }
        _ => title,
    }
}

/// Description for `mass`, at the most detailed level that fits [`MAX_DESCRIPTION_LENGTH`].
pub fn generate_description(mass: &Mass) -> String {
    for detail in Detail::ALL {
        let description = render_description(mass, detail);
        if description.len() <= MAX_DESCRIPTION_LENGTH {
            return description;
        }
        tracing::debug!(
            ?detail,
            len = description.len(),
            "description too long, dropping detail"
        );
    }
    render_description(mass, Detail::Bare)
}

pub fn render_description(mass: &Mass, detail: Detail) -> String {
    let mut out = String::from(PREAMBLE);
    let body = render_body(&mass.sections, detail);
    if !body.is_empty() {
        out.push_str("\n\n");
        out.push_str(&body);
    }
    if !mass.url.is_empty() {
        out.push_str("\n\nFull readings: ");
        out.push_str(&mass.url);
    }
    out
}

fn render_body(sections: &[Section], detail: Detail) -> String {
    let mut blocks = Vec::new();
    for section in sections {
        let readings: &[Reading] = match detail {
            Detail::Full => &section.readings[..],
            Detail::FirstReading | Detail::Headers => {
                &section.readings[..section.readings.len().min(1)]
            }
            Detail::Bare => &[],
        };
        for reading in readings {
            if detail == Detail::Headers {
                blocks.push(format!("{}: {reading}", section.header));
            } else {
                blocks.push(format!("{}: {reading}\n\n{}", section.header, reading.text));
            }
        }
    }
    let separator = if detail == Detail::Headers { "\n" } else { "\n\n" };
    blocks.join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use pretty_assertions::assert_eq;

    fn reading(citation: &str, text: &str) -> Reading {
        Reading {
            citation: citation.to_string(),
            text: text.to_string(),
        }
    }

    fn mass(sections: Vec<Section>) -> Mass {
        Mass {
            date: Some(date(2024, 3, 17)),
            title: Some("Fifth Sunday of Lent".to_string()),
            url: "https://bible.usccb.org/bible/readings/031724.cfm".to_string(),
            sections,
        }
    }

    fn lenten_mass(gospel_len: usize) -> Mass {
        mass(vec![
            Section {
                header: "Reading I".to_string(),
                readings: vec![reading("Jer 31:31-34", "The days are coming.")],
            },
            Section {
                header: "Gospel".to_string(),
                readings: vec![
                    reading("Jn 12:20-33", &"a".repeat(gospel_len)),
                    reading("Jn 11:1-45", &"b".repeat(gospel_len)),
                ],
            },
        ])
    }

    #[test]
    fn title_formats_date_and_time() {
        let when = date(2024, 3, 16)
            .at(17, 30, 0, 0)
            .in_tz("America/New_York")
            .unwrap();
        assert_eq!(generate_title(&when, None), "Mass March 16, 2024 - 5:30 PM");
        assert_eq!(
            generate_title(&when, Some("Fifth Sunday of Lent")),
            "Mass March 16, 2024 - 5:30 PM - Fifth Sunday of Lent"
        );
        assert_eq!(
            generate_title(&when, Some(&"x".repeat(80))),
            "Mass March 16, 2024 - 5:30 PM"
        );
    }

    #[test]
    fn small_masses_render_in_full() {
        let mass = mass(vec![Section {
            header: "Gospel".to_string(),
            readings: vec![reading("Jn 3:16", "For God so loved the world.")],
        }]);
        assert_eq!(
            generate_description(&mass),
            format!(
                "{PREAMBLE}\n\nGospel: Jn 3:16\n\nFor God so loved the world.\n\nFull readings: {}",
                mass.url
            )
        );
    }

    #[test]
    fn full_tier_is_used_when_it_fits() {
        let mass = lenten_mass(100);
        assert_eq!(
            generate_description(&mass),
            render_description(&mass, Detail::Full)
        );
        assert!(generate_description(&mass).contains("Jn 11:1-45"));
    }

    #[test]
    fn alternatives_are_dropped_first() {
        // Two gospels of half the limit each only fit one at a time.
        let mass = lenten_mass(MAX_DESCRIPTION_LENGTH / 2);
        assert!(render_description(&mass, Detail::Full).len() > MAX_DESCRIPTION_LENGTH);
        assert!(render_description(&mass, Detail::FirstReading).len() <= MAX_DESCRIPTION_LENGTH);

        let description = generate_description(&mass);
        assert_eq!(description, render_description(&mass, Detail::FirstReading));
        assert!(description.contains("Jn 12:20-33"));
        assert!(!description.contains("Jn 11:1-45"));
    }

    #[test]
    fn headers_only_when_texts_do_not_fit() {
        let mass = lenten_mass(6000);
        assert_eq!(
            generate_description(&mass),
            format!(
                "{PREAMBLE}\n\nReading I: Jer 31:31-34\nGospel: Jn 12:20-33\n\nFull readings: {}",
                mass.url
            )
        );
    }

    #[test]
    fn bare_template_as_last_resort() {
        let sections = (0..200)
            .map(|i| Section {
                header: format!("Section {i}"),
                readings: vec![reading(&"c".repeat(30), &"t".repeat(100))],
            })
            .collect();
        let mass = mass(sections);
        assert!(render_description(&mass, Detail::Headers).len() > MAX_DESCRIPTION_LENGTH);
        assert_eq!(
            generate_description(&mass),
            format!("{PREAMBLE}\n\nFull readings: {}", mass.url)
        );
    }

    #[test]
    fn masses_without_sections_or_url() {
        let empty = Mass {
            date: None,
            title: None,
            url: String::new(),
            sections: Vec::new(),
        };
        assert_eq!(generate_description(&empty), PREAMBLE);
    }
}
