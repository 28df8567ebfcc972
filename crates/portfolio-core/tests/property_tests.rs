//! Property-based tests for the controller invariants
//!
//! Uses proptest to drive random event sequences through a headless page and
//! checks the invariants after every step.

use std::time::Duration;

use portfolio_core::headless::{Harness, PageLayout};
use portfolio_core::{Key, Landmark, PageView, StyleProperty};
use proptest::prelude::*;

// ============================================================================
// Strategy Generators
// ============================================================================

/// Host events that can reach the page
#[derive(Debug, Clone)]
enum PageOp {
    Scroll(f64),
    Resize(f64),
    ToggleMenu,
    Escape,
    ClickOutside,
    ClickNavLink(usize),
    PressCard(usize),
    Advance(u64),
}

fn page_op_strategy() -> impl Strategy<Value = PageOp> {
    prop_oneof![
        4 => (0.0..3000.0f64).prop_map(PageOp::Scroll),
        2 => (320.0..1600.0f64).prop_map(PageOp::Resize),
        3 => Just(PageOp::ToggleMenu),
        1 => Just(PageOp::Escape),
        1 => Just(PageOp::ClickOutside),
        2 => (0..4usize).prop_map(PageOp::ClickNavLink),
        1 => (0..3usize).prop_map(PageOp::PressCard),
        1 => (0..400u64).prop_map(PageOp::Advance),
    ]
}

fn apply(page: &mut Harness, op: &PageOp) {
    match op {
        PageOp::Scroll(y) => page.scroll(*y),
        PageOp::Resize(width) => page.resize(*width),
        PageOp::ToggleMenu => {
            let toggle = page.view().node(Landmark::MenuToggle).unwrap();
            page.click(toggle);
        }
        PageOp::Escape => {
            let root = page.view().root();
            page.key_down(root, Key::Escape);
        }
        PageOp::ClickOutside => {
            let about = page.view().by_id("about").unwrap();
            page.click(about);
        }
        PageOp::ClickNavLink(index) => {
            let link = page.view().nodes(Landmark::NavLink)[*index];
            page.click(link);
        }
        PageOp::PressCard(index) => {
            let card = page.view().nodes(Landmark::ProjectCard)[*index];
            page.click(card);
        }
        PageOp::Advance(ms) => page.advance(Duration::from_millis(*ms)),
    }
}

fn active_link_count(page: &Harness) -> usize {
    page.view()
        .nodes(Landmark::NavLink)
        .into_iter()
        .filter(|n| page.view().has_class(*n, "active") || page.view().attribute(*n, "aria-current").is_some())
        .count()
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// At most one nav link is ever marked active
    #[test]
    fn at_most_one_active_link(
        width in 320.0..1600.0f64,
        ops in prop::collection::vec(page_op_strategy(), 0..40),
    ) {
        let mut page = Harness::new(PageLayout::portfolio().with_viewport_width(width)).unwrap();
        prop_assert!(active_link_count(&page) <= 1);

        for op in &ops {
            apply(&mut page, op);
            prop_assert!(active_link_count(&page) <= 1, "after {:?}", op);
        }
    }

    /// Scroll-lock holds exactly when the menu is open on a mobile viewport
    #[test]
    fn scroll_lock_tracks_menu_and_width(
        width in 320.0..1600.0f64,
        ops in prop::collection::vec(page_op_strategy(), 0..40),
    ) {
        let mut page = Harness::new(PageLayout::portfolio().with_viewport_width(width)).unwrap();
        let body = page.view().node(Landmark::Body).unwrap();

        for op in &ops {
            apply(&mut page, op);

            let open = page.controller().is_menu_open();
            let mobile = page.view().viewport_width() <= 768.0;
            let locked = page.controller().is_scroll_locked();

            prop_assert_eq!(locked, open && mobile, "after {:?}", op);
            prop_assert_eq!(
                page.view().style(body, StyleProperty::Overflow) == Some("hidden"),
                locked
            );
        }
    }

    /// The toggle's aria-expanded always mirrors the menu state
    #[test]
    fn aria_expanded_mirrors_menu(ops in prop::collection::vec(page_op_strategy(), 1..40)) {
        let mut page = Harness::new(PageLayout::portfolio().with_viewport_width(500.0)).unwrap();
        let toggle = page.view().node(Landmark::MenuToggle).unwrap();
        let nav = page.view().node(Landmark::NavContainer).unwrap();

        for op in &ops {
            apply(&mut page, op);
            if let Some(expanded) = page.view().attribute(toggle, "aria-expanded") {
                prop_assert_eq!(expanded == "true", page.controller().is_menu_open());
            }
            prop_assert_eq!(page.view().has_class(nav, "active"), page.controller().is_menu_open());
        }
    }

    /// Whatever happens, every pulse eventually reverts
    #[test]
    fn pulses_always_settle(ops in prop::collection::vec(page_op_strategy(), 0..40)) {
        let mut page = Harness::new(PageLayout::portfolio()).unwrap();
        for op in &ops {
            apply(&mut page, op);
        }

        page.advance(Duration::from_secs(1));

        prop_assert_eq!(page.controller().pending_tasks(), 0);
        for card in page.view().nodes(Landmark::ProjectCard) {
            prop_assert_eq!(page.view().style(card, StyleProperty::Transform), None);
        }
    }

    /// The active section is always the one under the reference point
    #[test]
    fn active_section_follows_scroll(y in 0.0..2600.0f64) {
        let mut page = Harness::new(PageLayout::portfolio()).unwrap();
        page.scroll(y);

        let point = y + 100.0;
        let expected = if point < 700.0 {
            "home"
        } else if point < 1300.0 {
            "about"
        } else if point < 2200.0 {
            "projects"
        } else {
            "contact"
        };
        prop_assert_eq!(page.controller().active_section(), Some(expected));
    }
}
