//! Related-paper listing returned alongside generated graphs.

use std::fmt;

use serde::{Deserialize, Serialize};

const DOI_RESOLVER: &str = "https://doi.org/";

/// Paper metadata as sent by the backend. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub doi: Option<String>,
}

/// Display-ready paper entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperEntry {
    Paper {
        title: String,
        authors: String,
        published: String,
        link: Option<String>,
    },
    /// Shown in place of an empty list.
    Placeholder,
}

impl fmt::Display for PaperEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paper {
                title,
                authors,
                published,
                link,
            } => {
                writeln!(f, "{}", title)?;
                writeln!(f, "  {}", authors)?;
                write!(f, "  {}", published)?;
                if let Some(link) = link {
                    write!(f, "\n  {}", link)?;
                }
                Ok(())
            }
            Self::Placeholder => f.write_str("No related papers found."),
        }
    }
}

/// Link for a DOI, resolved through doi.org unless already a URL.
pub fn doi_link(doi: &str) -> String {
    if doi.starts_with("http") {
        doi.to_string()
    } else {
        format!("{}{}", DOI_RESOLVER, doi)
    }
}

fn render_one(paper: &Paper) -> PaperEntry {
    let names: Vec<&str> = paper
        .authors
        .iter()
        .flatten()
        .filter_map(|a| a.as_deref())
        .collect();
    let authors = if names.is_empty() {
        "Unknown authors".to_string()
    } else {
        names.join(", ")
    };

    let published = match paper.year {
        Some(year) => format!("Published: {}", year),
        None => "Published: Year unknown".to_string(),
    };

    PaperEntry::Paper {
        title: paper.title.clone().unwrap_or_default(),
        authors,
        published,
        link: paper
            .doi
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(doi_link),
    }
}

/// Render papers for display; an empty list yields one placeholder.
pub fn render_papers(papers: &[Paper]) -> Vec<PaperEntry> {
    if papers.is_empty() {
        return vec![PaperEntry::Placeholder];
    }
    papers.iter().map(render_one).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_paper() {
        let paper = Paper {
            title: Some("Smoking and lung cancer".into()),
            authors: Some(vec![Some("R. Doll".into()), None, Some("A. B. Hill".into())]),
            year: Some(1950),
            doi: Some("10.1136/bmj.2.4682.739".into()),
        };
        let entries = render_papers(&[paper]);
        assert_eq!(
            entries[0],
            PaperEntry::Paper {
                title: "Smoking and lung cancer".into(),
                authors: "R. Doll, A. B. Hill".into(),
                published: "Published: 1950".into(),
                link: Some("https://doi.org/10.1136/bmj.2.4682.739".into()),
            }
        );
    }

    #[test]
    fn test_missing_fields() {
        let entries = render_papers(&[Paper {
            title: Some("Untitled".into()),
            ..Default::default()
        }]);
        match &entries[0] {
            PaperEntry::Paper {
                authors,
                published,
                link,
                ..
            } => {
                assert_eq!(authors, "Unknown authors");
                assert_eq!(published, "Published: Year unknown");
                assert!(link.is_none());
            }
            PaperEntry::Placeholder => panic!("expected a paper"),
        }
    }

    #[test]
    fn test_absolute_doi_kept() {
        assert_eq!(doi_link("https://doi.org/10.1/x"), "https://doi.org/10.1/x");
    }

    #[test]
    fn test_empty_list_placeholder() {
        let entries = render_papers(&[]);
        assert_eq!(entries, vec![PaperEntry::Placeholder]);
        assert_eq!(entries[0].to_string(), "No related papers found.");
    }

    #[test]
    fn test_decodes_openalex_shape() {
        let json = r#"{"title":"T","year":null,"doi":"https://doi.org/10.2/y","authors":[null]}"#;
        let paper: Paper = serde_json::from_str(json).unwrap();
        assert_eq!(paper.authors, Some(vec![None]));
        assert!(paper.year.is_none());
    }
}
