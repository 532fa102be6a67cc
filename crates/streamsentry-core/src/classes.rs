// crates/streamsentry-core/src/classes.rs
//
// Fixed detector class-id tables. These must be reproduced byte-for-byte —
// they are the contract the downstream moderation UI matches against, not
// just display strings we're free to tweak.

use crate::policy::VideoCategories;

/// Display name (`detail`) and event `category` for a detector class id.
///
/// `None` means the id is not one of the nine known classes; callers treat
/// this the way the reference detector treats an unmapped class — the
/// detection is kept but never turned into an event.
pub fn class_info(class_id: i64) -> Option<(&'static str, &'static str)> {
    match class_id {
        0 => Some(("술", "음주")),
        1 => Some(("술잔", "음주")),
        2 => Some(("드라이버", "날카로운 도구")),
        3 => Some(("담배", "흡연")),
        4 => Some(("커터칼", "날카로운 도구")),
        5 => Some(("칼", "날카로운 도구")),
        6 => Some(("불", "화기류")),
        7 => Some(("총", "총기류")),
        8 => Some(("라이터", "화기류")),
        _ => None,
    }
}

pub fn class_display_name(class_id: i64) -> Option<&'static str> {
    class_info(class_id).map(|(name, _)| name)
}

pub fn category_name(class_id: i64) -> Option<&'static str> {
    class_info(class_id).map(|(_, category)| category)
}

/// Expands the boolean category flags in a policy into the concrete set of
/// detector class ids the video worker should keep.
///
/// Mirrors the fixed category → class-id map: `smoke→{3}`, `drink→{0,1}`,
/// `sharpObjects→{2,4,5}`, `flammables→{6,8}`, `firearms→{7}`,
/// `exposure→{}` (no detector class backs this category yet).
pub fn enabled_class_ids(categories: &VideoCategories) -> Vec<i64> {
    let mut ids = Vec::new();
    if categories.smoke {
        ids.extend_from_slice(&[3]);
    }
    if categories.drink {
        ids.extend_from_slice(&[0, 1]);
    }
    if categories.sharp_objects {
        ids.extend_from_slice(&[2, 4, 5]);
    }
    if categories.flammables {
        ids.extend_from_slice(&[6, 8]);
    }
    if categories.firearms {
        ids.extend_from_slice(&[7]);
    }
    // `exposure` has no backing class ids today; kept as a flag so policy
    // payloads from the registry round-trip even though it's a no-op here.
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_table_matches_fixed_spec() {
        assert_eq!(class_info(0), Some(("술", "음주")));
        assert_eq!(class_info(3), Some(("담배", "흡연")));
        assert_eq!(class_info(7), Some(("총", "총기류")));
        assert_eq!(class_info(9), None);
    }

    #[test]
    fn enabled_class_ids_follows_fixed_map() {
        let mut cats = VideoCategories::default();
        cats.smoke = true;
        cats.firearms = true;
        let mut ids = enabled_class_ids(&cats);
        ids.sort();
        assert_eq!(ids, vec![3, 7]);
    }

    #[test]
    fn all_categories_false_yields_empty_set() {
        let cats = VideoCategories::default();
        assert!(enabled_class_ids(&cats).is_empty());
    }
}
