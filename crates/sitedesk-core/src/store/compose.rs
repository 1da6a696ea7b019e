// In-memory join of base rows with their translations and image links.

use sitedesk_api::RowId;

use crate::model::{Full, ImageLink};

/// Attach to each record the translations and images whose parent key
/// equals its id. Images are ordered by position; translations keep the
/// order they were fetched in.
pub(crate) fn compose<R, T>(
    records: Vec<R>,
    id_of: impl Fn(&R) -> &RowId,
    translations: &[(RowId, T)],
    images: &[ImageLink],
) -> Vec<Full<R, T>>
where
    T: Clone,
{
    records
        .into_iter()
        .map(|record| {
            let id = id_of(&record);
            let translations = translations
                .iter()
                .filter(|(parent, _)| parent == id)
                .map(|(_, t)| t.clone())
                .collect();
            let mut images: Vec<ImageLink> = images
                .iter()
                .filter(|link| link.parent_id.as_ref() == Some(id))
                .cloned()
                .collect();
            images.sort_by_key(|link| link.sort_order);
            Full {
                record,
                translations,
                images,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Base {
        id: RowId,
    }

    fn link(id: i64, parent: &str, sort_order: i64) -> ImageLink {
        ImageLink {
            id: RowId::Int(id),
            parent_id: Some(RowId::from(parent)),
            media_id: Some(RowId::Int(id * 10)),
            sort_order,
            is_cover: false,
            media_asset: None,
        }
    }

    #[test]
    fn attaches_matching_children_only() {
        let records = vec![Base { id: "a".into() }, Base { id: "b".into() }];
        let translations = vec![
            (RowId::from("a"), "a-en"),
            (RowId::from("b"), "b-en"),
            (RowId::from("a"), "a-ar"),
        ];
        let images = vec![link(1, "b", 0), link(2, "a", 0)];

        let full = compose(records, |r| &r.id, &translations, &images);

        assert_eq!(full.len(), 2);
        assert_eq!(full[0].translations, vec!["a-en", "a-ar"]);
        assert_eq!(full[1].translations, vec!["b-en"]);
        assert_eq!(full[0].images[0].id, RowId::Int(2));
        assert_eq!(full[1].images[0].id, RowId::Int(1));
    }

    #[test]
    fn images_sorted_by_position() {
        let records = vec![Base { id: "a".into() }];
        let images = vec![link(1, "a", 2), link(2, "a", 0), link(3, "a", 1)];
        let full = compose::<_, ()>(records, |r| &r.id, &[], &images);
        let ids: Vec<_> = full[0].images.iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids, vec![RowId::Int(2), RowId::Int(3), RowId::Int(1)]);
    }

    #[test]
    fn text_and_integer_keys_do_not_cross_match() {
        let records = vec![Base { id: RowId::Int(7) }];
        let translations = vec![(RowId::from("7"), "text-keyed")];
        let full = compose(records, |r| &r.id, &translations, &[]);
        assert!(full[0].translations.is_empty());
    }
}
