// Windowing always covers every item intersecting the viewport

use proptest::prelude::*;
use resource_timeline::services::window::{prefix_offsets, visible_range};

proptest! {
    /// Property: the window contains every intersecting item and is never empty
    #[test]
    fn prop_window_contains_intersecting_items(
        sizes in prop::collection::vec(1.0f32..120.0, 1..80),
        scroll_fraction in 0.0f32..1.2,
        viewport in 0.0f32..900.0,
        overscan in 0usize..5,
    ) {
        let offsets = prefix_offsets(sizes.iter().copied());
        let total = *offsets.last().unwrap();
        let scroll = total * scroll_fraction;
        let window = visible_range(&offsets, scroll, viewport, overscan);

        prop_assert!(window.start < window.end);
        prop_assert!(window.end <= sizes.len());
        for i in 0..sizes.len() {
            let intersects = offsets[i] < scroll + viewport && offsets[i + 1] > scroll;
            if intersects {
                prop_assert!(window.contains(&i), "item {} missing from {:?}", i, window);
            }
        }
    }

    /// Property: overscan only ever widens the window
    #[test]
    fn prop_overscan_widens(
        sizes in prop::collection::vec(1.0f32..120.0, 1..80),
        scroll in 0.0f32..4000.0,
        viewport in 1.0f32..900.0,
        overscan in 1usize..5,
    ) {
        let offsets = prefix_offsets(sizes.iter().copied());
        let tight = visible_range(&offsets, scroll, viewport, 0);
        let wide = visible_range(&offsets, scroll, viewport, overscan);
        prop_assert!(wide.start <= tight.start && wide.end >= tight.end);
    }
}
