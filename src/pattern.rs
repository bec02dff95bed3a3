//! Pattern generalization and expansion.
//!
//! A pattern is a single-segment name template where `*` stands for a run of
//! one or more decimal digits: `task-rest*` covers `task-rest01` through
//! `task-rest99` but never `task-restA`. Generalization rewrites a concrete
//! deletable path into a template using the pattern's own text; expansion
//! resolves a template back into the concrete absolute paths present under a
//! target directory.
//!
//! Expansion runs in two cooperating steps: a cheap filesystem glob (with `*`
//! as an any-character wildcard) gathers a superset of candidates, then each
//! candidate is re-checked segment by segment against the digit-only matcher
//! to discard false positives.

use crate::error::CleanError;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A resolved deletion target.
///
/// `required` is true for literal plan entries; a missing required target
/// means the document and the target directory have diverged. Pattern
/// expansion hits are never required, since they are derived from whatever
/// the filesystem actually contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub required: bool,
}

/// A validated, compiled pattern list.
///
/// Every pattern is compiled up front; a bad pattern aborts the run before
/// any deletion is attempted.
#[derive(Debug)]
pub struct PatternSet {
    entries: Vec<PatternEntry>,
}

#[derive(Debug)]
struct PatternEntry {
    text: String,
    matcher: Regex,
}

impl PatternSet {
    pub fn compile(patterns: &[String]) -> Result<Self, CleanError> {
        let mut entries = Vec::with_capacity(patterns.len());
        for text in patterns {
            if text.is_empty() {
                return Err(CleanError::InvalidPattern {
                    pattern: text.clone(),
                    reason: "pattern is empty".to_string(),
                });
            }
            if text.contains('/') {
                return Err(CleanError::InvalidPattern {
                    pattern: text.clone(),
                    reason: "pattern must name a single path segment".to_string(),
                });
            }
            entries.push(PatternEntry {
                text: text.clone(),
                matcher: segment_matcher(text)?,
            });
        }
        Ok(PatternSet { entries })
    }

    /// Rewrite one path segment: the first pattern whose matcher covers the
    /// whole segment substitutes its own text; otherwise the segment passes
    /// through unchanged.
    fn generalize_segment(&self, segment: &str) -> String {
        for entry in &self.entries {
            if entry.matcher.is_match(segment) {
                return entry.text.clone();
            }
        }
        segment.to_string()
    }

    fn generalize_path(&self, rel_path: &str) -> String {
        rel_path
            .split('/')
            .map(|segment| self.generalize_segment(segment))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Compile one template segment into an anchored matcher with every `*`
/// replaced by "one or more digits". Literal runs are regex-escaped.
fn segment_matcher(segment: &str) -> Result<Regex, CleanError> {
    let mut source = String::from("^");
    for (i, literal) in segment.split('*').enumerate() {
        if i > 0 {
            source.push_str("[0-9]+");
        }
        source.push_str(&regex::escape(literal));
    }
    source.push('$');

    Regex::new(&source).map_err(|err| CleanError::InvalidPattern {
        pattern: segment.to_string(),
        reason: err.to_string(),
    })
}

/// Generalize deletable relative paths into templates, per path segment.
///
/// Paths with no pattern match pass through as literal paths. Duplicate
/// templates collapse to one entry, keeping first-seen order so the caller's
/// deletion ordering survives.
pub fn generalize(paths: &[String], patterns: &PatternSet) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut templates = Vec::new();

    for path in paths {
        let template = patterns.generalize_path(path);
        if seen.insert(template.clone()) {
            templates.push(template);
        }
    }

    templates
}

/// Expand templates into concrete absolute targets under `target_root`.
///
/// Literal templates resolve directly and are required to exist. Wildcarded
/// templates contribute whatever the filesystem scan turns up, possibly
/// nothing; zero matches is not an error. Duplicate concrete paths collapse,
/// keeping first-seen order.
pub fn expand(templates: &[String], target_root: &Path) -> Result<Vec<Target>, CleanError> {
    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for template in templates {
        if template.contains('*') {
            for hit in expand_template(template, target_root)? {
                if seen.insert(hit.clone()) {
                    targets.push(Target {
                        path: hit,
                        required: false,
                    });
                }
            }
        } else {
            let path = target_root.join(template);
            if seen.insert(path.clone()) {
                targets.push(Target {
                    path,
                    required: true,
                });
            }
        }
    }

    Ok(targets)
}

/// Per-segment check applied to glob candidates.
enum SegmentCheck {
    Literal(String),
    Digits(Regex),
}

fn expand_template(template: &str, target_root: &Path) -> Result<Vec<PathBuf>, CleanError> {
    let segments: Vec<&str> = template.split('/').collect();

    // Glob superset: any-character wildcard, literal runs escaped.
    let mut glob_source = glob::Pattern::escape(&target_root.to_string_lossy());
    for segment in &segments {
        glob_source.push('/');
        let escaped: Vec<String> = segment
            .split('*')
            .map(|part| glob::Pattern::escape(part))
            .collect();
        glob_source.push_str(&escaped.join("*"));
    }

    let checks: Vec<SegmentCheck> = segments
        .iter()
        .map(|segment| {
            if segment.contains('*') {
                Ok(SegmentCheck::Digits(segment_matcher(segment)?))
            } else {
                Ok(SegmentCheck::Literal((*segment).to_string()))
            }
        })
        .collect::<Result<_, CleanError>>()?;

    let candidates = glob::glob(&glob_source).map_err(|err| CleanError::InvalidPattern {
        pattern: template.to_string(),
        reason: err.to_string(),
    })?;

    let mut hits = Vec::new();
    for candidate in candidates {
        let path = match candidate {
            Ok(path) => path,
            Err(err) => {
                eprintln!("Warning: Failed to access candidate path: {}", err);
                continue;
            }
        };
        if template_matches(&path, target_root, &checks) {
            hits.push(path);
        }
    }

    hits.sort();
    Ok(hits)
}

/// Digit-constrained re-check of a glob candidate: the path relative to the
/// target root must have exactly one component per template segment, literal
/// segments matching exactly and wildcard segments matching digits-only.
fn template_matches(path: &Path, target_root: &Path, checks: &[SegmentCheck]) -> bool {
    let Ok(relative) = path.strip_prefix(target_root) else {
        return false;
    };

    let components: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if components.len() != checks.len() {
        return false;
    }

    components
        .iter()
        .zip(checks)
        .all(|(component, check)| match check {
            SegmentCheck::Literal(literal) => component == literal,
            SegmentCheck::Digits(matcher) => matcher.is_match(component),
        })
}
