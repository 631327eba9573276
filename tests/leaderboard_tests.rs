mod common;

use chess_dashboard_lambda_rust::leaderboard::{rank, LeaderboardPage, LeaderboardView, RankBadge};
use chess_dashboard_lambda_rust::lichess::{decode_leaderboard, ApiError};
use chess_dashboard_lambda_rust::model::Variant;

#[test]
fn rank_is_position_plus_one() {
    let players = decode_leaderboard(common::LEADERBOARD_BULLET).expect("decode");
    let entries = rank(Variant::Bullet, &players);

    for (index, entry) in entries.iter().enumerate() {
        assert_eq!(entry.rank, index + 1, "entry was: {:?}", entry);
    }
    assert_eq!(entries[0].badge, RankBadge::Gold);
    assert_eq!(entries[0].rating, 3211);
    assert_eq!(entries[3].progress, 0, "missing progress defaults to zero");
}

#[test]
fn missing_variant_rating_defaults_to_zero() {
    let players = decode_leaderboard(common::LEADERBOARD_BULLET).expect("decode");
    let entries = rank(Variant::Blitz, &players);
    assert!(entries.iter().all(|e| e.rating == 0 && e.progress == 0));
}

#[test]
fn default_selection_is_bullet() {
    let view = LeaderboardView::new();
    assert_eq!(view.selected(), Variant::Bullet);
    assert!(view.entries().is_empty());
    assert!(!view.is_loading());
}

#[test]
fn late_response_for_previous_variant_is_discarded() {
    let mut view = LeaderboardView::new();
    let bullet = view.select(Variant::Bullet);
    let blitz = view.select(Variant::Blitz);

    // Blitz resolves first, then the slow bullet response arrives.
    assert!(view.resolve(blitz, decode_leaderboard(common::LEADERBOARD_BLITZ)));
    assert!(!view.resolve(bullet, decode_leaderboard(common::LEADERBOARD_BULLET)));

    assert_eq!(view.selected(), Variant::Blitz);
    let names: Vec<&str> = view.entries().iter().map(|e| e.username.as_str()).collect();
    assert_eq!(names, ["alireza2003", "DrNykterstein"]);
    assert_eq!(view.entries()[0].rating, 3150);
}

#[test]
fn early_stale_response_keeps_view_loading() {
    let mut view = LeaderboardView::new();
    let bullet = view.select(Variant::Bullet);
    let blitz = view.select(Variant::Blitz);

    assert!(!view.resolve(bullet, decode_leaderboard(common::LEADERBOARD_BULLET)));
    assert!(view.is_loading());
    assert!(view.entries().is_empty());

    assert!(view.resolve(blitz, decode_leaderboard(common::LEADERBOARD_BLITZ)));
    assert!(!view.is_loading());
    assert_eq!(view.entries().len(), 2);
}

#[test]
fn new_selection_replaces_previous_list() {
    let mut view = LeaderboardView::new();
    let bullet = view.select(Variant::Bullet);
    view.resolve(bullet, decode_leaderboard(common::LEADERBOARD_BULLET));
    assert_eq!(view.entries().len(), 4);

    let blitz = view.select(Variant::Blitz);
    view.resolve(blitz, decode_leaderboard(common::LEADERBOARD_BLITZ));
    assert_eq!(view.entries().len(), 2);
}

#[test]
fn failed_fetch_degrades_to_empty_list() {
    let mut view = LeaderboardView::new();
    let bullet = view.select(Variant::Bullet);
    view.resolve(bullet, decode_leaderboard(common::LEADERBOARD_BULLET));

    let again = view.refresh();
    assert!(view.resolve(again, Err(ApiError::Status(503))));
    assert!(view.entries().is_empty());
    assert!(view.is_unavailable());

    let page = LeaderboardPage::from_view(&view);
    assert_eq!(page.render(), "Bullet Leaderboard\nNo Data Available");
}

#[test]
fn page_renders_ranks_titles_and_progress() {
    let mut view = LeaderboardView::new();
    let ticket = view.select(Variant::Bullet);
    view.resolve(ticket, decode_leaderboard(common::LEADERBOARD_BULLET));

    let text = LeaderboardPage::from_view(&view).render();
    assert!(text.starts_with("Bullet Leaderboard\n"), "text was: {}", text);
    assert!(text.contains("#1   GM DrNykterstein 3211 (+12)"), "text was: {}", text);
    assert!(text.contains("#2   GM penguingim1 3187 (-4)"), "text was: {}", text);
    assert!(text.contains("#4   Night-King96 3102"), "text was: {}", text);
}
