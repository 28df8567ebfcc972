//! Landmark lookup performed once at bind time.

use std::collections::HashSet;

use crate::error::{PageError, PageResult};
use crate::view::{Landmark, NodeId, PageView};

/// A content section with its stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRef {
    pub node: NodeId,
    pub id: String,
}

/// A navigation link and the reference target it had at bind time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLinkRef {
    pub node: NodeId,
    pub target: Option<String>,
}

impl NavLinkRef {
    /// Whether this link points at the section with `id`.
    pub fn targets(&self, id: &str) -> bool {
        self.target
            .as_deref()
            .and_then(|t| t.strip_prefix('#'))
            .is_some_and(|t| t == id)
    }
}

/// Every element the controller binds to.
#[derive(Debug, Clone)]
pub struct Landmarks {
    pub sections: Vec<SectionRef>,
    pub nav_links: Vec<NavLinkRef>,
    pub menu_toggle: NodeId,
    pub nav_container: NodeId,
    pub header: NodeId,
    pub skip_link: NodeId,
    pub body: NodeId,
    pub project_cards: Vec<NodeId>,
    /// Absent contact action disables its affordances
    pub contact_action: Option<NodeId>,
    pub year_slot: Option<NodeId>,
}

impl Landmarks {
    /// Locate all landmarks, failing on a missing required one.
    pub fn bind<V: PageView>(view: &mut V) -> PageResult<Self> {
        let menu_toggle = required(view, Landmark::MenuToggle)?;
        let nav_container = required(view, Landmark::NavContainer)?;
        let header = required(view, Landmark::Header)?;
        let skip_link = required(view, Landmark::SkipLink)?;
        let body = required(view, Landmark::Body)?;

        let mut seen = HashSet::new();
        let mut sections = Vec::new();
        for node in view.query_all(Landmark::Section) {
            let id = match view.attribute(node, "id") {
                Some(id) if !id.is_empty() => id,
                _ => {
                    tracing::warn!(%node, "section without id, skipped");
                    continue;
                }
            };
            if !seen.insert(id.clone()) {
                return Err(PageError::DuplicateSection(id));
            }
            sections.push(SectionRef { node, id });
        }
        if sections.is_empty() {
            tracing::warn!("no sections found, active navigation disabled");
        }

        let nav_links = view
            .query_all(Landmark::NavLink)
            .into_iter()
            .map(|node| NavLinkRef {
                node,
                target: view.attribute(node, "href"),
            })
            .collect::<Vec<_>>();

        let project_cards = view.query_all(Landmark::ProjectCard);

        let contact_action = view.query_one(Landmark::ContactAction);
        if contact_action.is_none() {
            tracing::debug!("contact action absent, affordances disabled");
        }
        let year_slot = view.query_one(Landmark::YearSlot);

        tracing::debug!(
            sections = sections.len(),
            nav_links = nav_links.len(),
            cards = project_cards.len(),
            "landmarks bound"
        );

        Ok(Self {
            sections,
            nav_links,
            menu_toggle,
            nav_container,
            header,
            skip_link,
            body,
            project_cards,
            contact_action,
            year_slot,
        })
    }

    /// Index of the nav link whose target is exactly `fragment` (with `#`).
    pub fn link_for_fragment(&self, fragment: &str) -> Option<usize> {
        self.nav_links
            .iter()
            .position(|link| link.target.as_deref() == Some(fragment))
    }

    /// Index of the nav link pointing at the section with `id`.
    pub fn link_for_section(&self, id: &str) -> Option<usize> {
        self.nav_links.iter().position(|link| link.targets(id))
    }

    pub fn nav_link_index(&self, node: NodeId) -> Option<usize> {
        self.nav_links.iter().position(|link| link.node == node)
    }

    pub fn section_index(&self, node: NodeId) -> Option<usize> {
        self.sections.iter().position(|section| section.node == node)
    }

    pub fn card_index(&self, node: NodeId) -> Option<usize> {
        self.project_cards.iter().position(|card| *card == node)
    }

    pub fn is_contact(&self, node: NodeId) -> bool {
        self.contact_action == Some(node)
    }
}

fn required<V: PageView>(view: &mut V, landmark: Landmark) -> PageResult<NodeId> {
    view.query_one(landmark)
        .ok_or(PageError::MissingLandmark(landmark))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_targets() {
        let link = NavLinkRef {
            node: NodeId(1),
            target: Some("#projects".to_string()),
        };
        assert!(link.targets("projects"));
        assert!(!link.targets("about"));

        let external = NavLinkRef {
            node: NodeId(2),
            target: Some("https://example.com/#projects".to_string()),
        };
        assert!(!external.targets("projects"));
    }
}
