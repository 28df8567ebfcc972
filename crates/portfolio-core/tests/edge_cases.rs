//! Edge case and degraded-page tests
//!
//! These tests verify the controller copes with missing optional elements,
//! refuses pages missing required ones, and resolves ambiguous layouts the
//! documented way.

use std::time::Duration;

use portfolio_core::headless::{CardLayout, Harness, MemoryView, PageLayout, SectionLayout};
use portfolio_core::{
    Controller, EventKind, Landmark, Listener, PageError, PageEvent, PageView, PortfolioConfig,
    StyleProperty, Target, TaskId,
};

fn section(id: &str, top: f64, height: f64) -> SectionLayout {
    SectionLayout {
        id: Some(id.to_string()),
        top,
        height,
    }
}

// ============================================================================
// Missing landmarks
// ============================================================================

#[test]
fn test_missing_required_landmarks_fail_fast() {
    for landmark in [
        Landmark::NavContainer,
        Landmark::MenuToggle,
        Landmark::Header,
        Landmark::SkipLink,
        Landmark::Body,
    ] {
        let result = Harness::new(PageLayout::portfolio().without(landmark));
        match result {
            Err(PageError::MissingLandmark(missing)) => assert_eq!(missing, landmark),
            Err(other) => panic!("unexpected error for {}: {}", landmark, other),
            Ok(_) => panic!("page without {} should not bind", landmark),
        }
    }
}

#[test]
fn test_missing_contact_action_disables_only_that_feature() {
    let mut page = Harness::new(PageLayout::portfolio().without(Landmark::ContactAction)).unwrap();

    assert!(page.controller().landmarks().contact_action.is_none());
    assert!(!page
        .view()
        .listeners()
        .iter()
        .any(|l| l.kind == EventKind::MouseEnter));

    page.scroll(1300.0);
    assert_eq!(page.controller().active_section(), Some("projects"));
}

#[test]
fn test_missing_year_slot_is_tolerated() {
    let page = Harness::new(PageLayout::portfolio().without(Landmark::YearSlot)).unwrap();
    assert!(page.controller().landmarks().year_slot.is_none());
    assert!(page.controller().state().is_initialized());
}

#[test]
fn test_page_without_sections_or_cards() {
    let mut page = Harness::new(PageLayout::default()).unwrap();

    page.scroll(500.0);
    assert_eq!(page.controller().active_section(), None);
    assert!(page.controller().landmarks().project_cards.is_empty());
}

// ============================================================================
// Section binding
// ============================================================================

#[test]
fn test_duplicate_section_ids_rejected() {
    let mut layout = PageLayout::portfolio();
    layout.sections.push(section("about", 3000.0, 100.0));

    match Harness::new(layout) {
        Err(PageError::DuplicateSection(id)) => assert_eq!(id, "about"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("duplicate ids should not bind"),
    }
}

#[test]
fn test_section_without_id_is_skipped() {
    let mut layout = PageLayout::portfolio();
    layout.sections.push(SectionLayout {
        id: None,
        top: 2700.0,
        height: 300.0,
    });

    let page = Harness::new(layout).unwrap();
    assert_eq!(page.controller().landmarks().sections.len(), 4);
}

// ============================================================================
// Active navigation ambiguity
// ============================================================================

#[test]
fn test_overlapping_sections_last_match_wins() {
    let layout = PageLayout {
        sections: vec![section("intro", 0.0, 1000.0), section("overlay", 0.0, 500.0)],
        nav_links: vec!["#intro".to_string(), "#overlay".to_string()],
        ..Default::default()
    };

    let page = Harness::new(layout).unwrap();
    assert_eq!(page.controller().active_section(), Some("overlay"));
}

#[test]
fn test_scrolling_past_all_sections_keeps_marker() {
    let mut page = Harness::new(PageLayout::portfolio()).unwrap();
    page.scroll(2500.0);
    assert_eq!(page.controller().active_section(), Some("contact"));

    page.scroll(10_000.0);
    assert_eq!(page.controller().active_section(), Some("contact"));
}

#[test]
fn test_section_without_link_clears_marker() {
    let mut layout = PageLayout::portfolio();
    layout.nav_links.retain(|href| href != "#about");

    let mut page = Harness::new(layout).unwrap();
    assert_eq!(page.controller().active_section(), Some("home"));

    page.scroll(700.0);
    assert_eq!(page.controller().active_section(), None);
    let active = page
        .view()
        .nodes(Landmark::NavLink)
        .into_iter()
        .filter(|n| page.view().has_class(*n, "active"))
        .count();
    assert_eq!(active, 0);
}

// ============================================================================
// Smooth scrolling fallbacks
// ============================================================================

#[test]
fn test_missing_fragment_target_keeps_default() {
    let mut layout = PageLayout::portfolio();
    layout.nav_links.push("#missing".to_string());
    let mut page = Harness::new(layout).unwrap();
    let link = *page.view().nodes(Landmark::NavLink).last().unwrap();

    let outcome = page.click(link);

    assert!(!outcome.is_prevented());
    assert!(page.view().scroll_requests().is_empty());
    assert!(page.view().history().is_empty());
}

#[test]
fn test_non_fragment_links_keep_default() {
    let mut layout = PageLayout::portfolio();
    layout.nav_links.push("https://example.com/cv.pdf".to_string());
    layout.nav_links.push("#".to_string());
    let mut page = Harness::new(layout).unwrap();
    let links = page.view().nodes(Landmark::NavLink);

    for link in &links[4..] {
        assert!(!page.click(*link).is_prevented());
    }
    assert!(page.view().scroll_requests().is_empty());
}

#[test]
fn test_desktop_nav_link_leaves_menu_open() {
    let mut page = Harness::new(PageLayout::portfolio()).unwrap();
    let toggle = page.view().node(Landmark::MenuToggle).unwrap();
    page.click(toggle);

    let link = page.view().nodes(Landmark::NavLink)[1];
    page.click(link);

    assert!(page.controller().is_menu_open());
}

#[test]
fn test_scroll_target_above_page_top() {
    let layout = PageLayout {
        sections: vec![section("top", 20.0, 400.0)],
        nav_links: vec!["#top".to_string()],
        ..Default::default()
    };
    let mut page = Harness::new(layout).unwrap();
    let link = page.view().node(Landmark::NavLink).unwrap();

    page.click(link);

    assert_eq!(page.view().scroll_requests()[0].top, -60.0);
    assert_eq!(page.view().scroll_y(), 0.0);
}

// ============================================================================
// Scheduling and dispatch oddities
// ============================================================================

#[test]
fn test_stale_timer_is_ignored() {
    let mut controller =
        Controller::bind(MemoryView::new(PageLayout::portfolio()), PortfolioConfig::default())
            .unwrap();
    controller.initialize();

    controller.dispatch(PageEvent::TimerElapsed(TaskId(999)));

    let card = controller.landmarks().project_cards[0];
    assert_eq!(controller.view().style(card, StyleProperty::Transform), None);
}

#[test]
fn test_events_for_unbound_nodes_are_ignored() {
    let mut page = Harness::new(PageLayout::portfolio()).unwrap();
    let root = page.view().root();

    let outcome = page
        .controller_mut()
        .dispatch(PageEvent::input(Target::Node(root), EventKind::Click));

    assert!(!outcome.is_prevented());
    assert!(!page.controller().is_menu_open());
}

#[test]
fn test_document_click_without_origin_is_ignored() {
    let layout = PageLayout::portfolio().with_viewport_width(500.0);
    let mut page = Harness::new(layout).unwrap();
    page.controller_mut().toggle_menu();

    page.controller_mut()
        .dispatch(PageEvent::input(Target::Document, EventKind::Click));

    assert!(page.controller().is_menu_open());
}

#[test]
fn test_pulses_on_different_cards_are_independent() {
    let layout = PageLayout {
        project_cards: vec![CardLayout::default(), CardLayout::default()],
        ..Default::default()
    };
    let mut page = Harness::new(layout).unwrap();
    let cards = page.view().nodes(Landmark::ProjectCard);

    page.click(cards[0]);
    page.click(cards[1]);
    assert_eq!(page.controller().pending_tasks(), 2);

    page.advance(Duration::from_millis(150));
    for card in cards {
        assert_eq!(page.view().style(card, StyleProperty::Transform), None);
    }
}

#[test]
fn test_invalid_config_rejected_at_bind() {
    let config = PortfolioConfig {
        reveal_threshold: 1.5,
        ..Default::default()
    };
    let result = Controller::bind(MemoryView::new(PageLayout::portfolio()), config);
    assert!(matches!(result, Err(PageError::InvalidConfig(_))));
}

#[test]
fn test_custom_breakpoint() {
    let config = PortfolioConfig {
        mobile_breakpoint: 1024.0,
        ..Default::default()
    };
    let layout = PageLayout::portfolio().with_viewport_width(900.0);
    let mut page = Harness::with_config(layout, config).unwrap();
    let toggle = page.view().node(Landmark::MenuToggle).unwrap();

    page.click(toggle);
    assert!(page.controller().is_scroll_locked());

    assert_eq!(
        page.view()
            .listener_count(Listener::new(Target::Window, EventKind::Resize)),
        1
    );
    page.resize(1100.0);
    assert!(!page.controller().is_menu_open());
}

#[test]
fn test_huge_card_stagger_saturates() {
    let config = PortfolioConfig {
        card_stagger_ms: u64::MAX,
        ..Default::default()
    };
    let page = Harness::with_config(PageLayout::portfolio(), config).unwrap();
    let cards = page.controller().landmarks().project_cards.clone();

    assert_eq!(
        page.view().style(cards[0], StyleProperty::AnimationDelay),
        Some("0ms")
    );
    let saturated = format!("{}ms", u64::MAX);
    for card in &cards[1..] {
        assert_eq!(
            page.view().style(*card, StyleProperty::AnimationDelay),
            Some(saturated.as_str())
        );
    }
}
