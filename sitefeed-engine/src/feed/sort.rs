use sitefeed_types::Post;

/// Derive the display order without touching the source collection:
/// pinned posts first, then most recent first. The comparator is total
/// (creation time breaks every tie) and is re-run from the live
/// collection on each render, so no copy is cached here.
pub fn display_order(posts: &[Post]) -> Vec<&Post> {
    let mut ordered: Vec<&Post> = posts.iter().collect();
    ordered.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    ordered
}
