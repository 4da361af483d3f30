// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattened, chronological revision lists and previous/next stepping.

use crate::model::{Discipline, Revision};

/// A revision together with its display label.
#[derive(Clone, Debug, PartialEq)]
pub struct RevisionEntry<'a> {
    /// `"<version>"` for discipline revisions, `"<region> <version>"` for
    /// region revisions.
    pub label: String,
    /// Name of the region the revision came from, if any.
    pub region: Option<&'a str>,
    /// The revision itself.
    pub revision: &'a Revision,
}

/// Collects every revision of a discipline into one list.
///
/// Revisions declared on the discipline come first, followed by those of each
/// region. The combined list is then ordered by date, oldest first, with
/// undated revisions treated as the oldest, and ties broken by label.
#[must_use]
pub fn flatten_revisions(discipline: &Discipline) -> Vec<RevisionEntry<'_>> {
    let own = discipline.revisions.iter().map(|revision| RevisionEntry {
        label: revision.version.clone(),
        region: None,
        revision,
    });
    let regional = discipline.regions.iter().flat_map(|region| {
        region.revisions.iter().map(move |revision| RevisionEntry {
            label: format!("{} {}", region.name, revision.version),
            region: Some(region.name.as_str()),
            revision,
        })
    });

    let mut entries: Vec<_> = own.chain(regional).collect();
    entries.sort_by(|a, b| {
        a.revision
            .sort_date()
            .cmp(&b.revision.sort_date())
            .then_with(|| a.label.cmp(&b.label))
    });
    entries
}

/// Finds `current` in a flattened list by image and version.
#[must_use]
pub fn position_of(entries: &[RevisionEntry<'_>], current: &Revision) -> Option<usize> {
    entries.iter().position(|e| e.revision.same_as(current))
}

/// Direction of a revision step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Towards older revisions.
    Previous,
    /// Towards newer revisions.
    Next,
}

/// Where previous/next would land from the current revision.
///
/// A `None` target means the corresponding control is disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepTargets {
    /// Index of the current revision, if it is in the list.
    pub current: Option<usize>,
    /// Index "previous" moves to.
    pub previous: Option<usize>,
    /// Index "next" moves to.
    pub next: Option<usize>,
}

impl StepTargets {
    /// Computes the targets for `current` within `entries`.
    ///
    /// When `current` is absent or not in the list, "previous" is disabled and
    /// "next" goes to the first entry.
    #[must_use]
    pub fn new(entries: &[RevisionEntry<'_>], current: Option<&Revision>) -> Self {
        let len = entries.len();
        let index = current.and_then(|c| position_of(entries, c));
        match index {
            Some(i) => Self {
                current: Some(i),
                previous: i.checked_sub(1),
                next: (i + 1 < len).then_some(i + 1),
            },
            None => Self {
                current: None,
                previous: None,
                next: (len > 0).then_some(0),
            },
        }
    }

    /// Returns the target for `step`.
    #[must_use]
    pub fn target(&self, step: Step) -> Option<usize> {
        match step {
            Step::Previous => self.previous,
            Step::Next => self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Region;

    fn rev(version: &str, image: &str, date: Option<&str>) -> Revision {
        Revision {
            version: version.into(),
            image: image.into(),
            date: date.map(Into::into),
            ..Revision::default()
        }
    }

    fn sample() -> Discipline {
        Discipline {
            revisions: vec![
                rev("REV2", "d2.png", Some("2024-02-01")),
                rev("REV1", "d1.png", Some("2024-01-01")),
            ],
            regions: vec![Region {
                name: "A".into(),
                polygon: None,
                revisions: vec![
                    rev("REV1", "a1.png", Some("2024-01-01")),
                    rev("REV0", "a0.png", None),
                ],
            }],
            ..Discipline::default()
        }
    }

    #[test]
    fn flattens_and_orders_by_date_then_label() {
        let d = sample();
        let labels: Vec<_> = flatten_revisions(&d).into_iter().map(|e| e.label).collect();
        assert_eq!(labels, ["A REV0", "A REV1", "REV1", "REV2"]);
    }

    #[test]
    fn region_entries_remember_their_region() {
        let d = sample();
        let entries = flatten_revisions(&d);
        assert_eq!(entries[0].region, Some("A"));
        assert_eq!(entries[2].region, None);
    }

    #[test]
    fn matching_needs_image_and_version() {
        let d = sample();
        let entries = flatten_revisions(&d);
        assert_eq!(position_of(&entries, &rev("REV1", "d1.png", None)), Some(2));
        assert_eq!(position_of(&entries, &rev("REV1", "a1.png", None)), Some(1));
        assert_eq!(position_of(&entries, &rev("REV1", "zz.png", None)), None);
    }

    #[test]
    fn step_targets_at_edges() {
        let d = Discipline {
            revisions: vec![
                rev("R1", "1.png", Some("2024-01-01")),
                rev("R2", "2.png", Some("2024-01-02")),
                rev("R3", "3.png", Some("2024-01-03")),
            ],
            ..Discipline::default()
        };
        let entries = flatten_revisions(&d);

        let first = StepTargets::new(&entries, Some(&d.revisions[0]));
        assert_eq!(first.previous, None);
        assert_eq!(first.next, Some(1));

        let last = StepTargets::new(&entries, Some(&d.revisions[2]));
        assert_eq!(last.previous, Some(1));
        assert_eq!(last.next, None);

        let stray = rev("R9", "9.png", None);
        let unmatched = StepTargets::new(&entries, Some(&stray));
        assert_eq!(unmatched.current, None);
        assert_eq!(unmatched.previous, None);
        assert_eq!(unmatched.target(Step::Next), Some(0));

        assert_eq!(StepTargets::new(&entries, None).next, Some(0));
        assert_eq!(StepTargets::new(&[], None), StepTargets::default());
    }
}
