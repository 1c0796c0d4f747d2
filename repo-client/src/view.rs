use shared_types::{CareerFilter, Material, Timestamp};

/// Filtered, searched and sorted projection of the materials mirror.
///
/// Keeps items whose career passes `filter` and whose title contains
/// `search` case-insensitively, newest first. Items the server has not
/// stamped yet sort as time zero. Pure; the input is never touched.
pub fn derive_view(materials: &[Material], filter: CareerFilter, search: &str) -> Vec<Material> {
    let needle = search.to_lowercase();

    let mut view: Vec<Material> = materials
        .iter()
        .filter(|m| filter.matches(m.career))
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    // stable: equal timestamps keep backend order
    view.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));
    view
}

fn sort_key(material: &Material) -> Timestamp {
    material.created_at.unwrap_or(Timestamp::from_seconds(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Career;

    fn material(id: &str, title: &str, career: Career, seconds: Option<i64>) -> Material {
        Material {
            id: id.to_string(),
            title: title.to_string(),
            career,
            url: format!("https://example.com/{id}"),
            author: String::new(),
            uploader_id: "u1".to_string(),
            uploader_name: "Ana".to_string(),
            created_at: seconds.map(Timestamp::from_seconds),
            verified: false,
        }
    }

    fn ids(view: &[Material]) -> Vec<&str> {
        view.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_career_and_search_filter() {
        let materials = vec![
            material("a", "Física III Apuntes", Career::SoftwareEngineering, Some(100)),
            material("b", "Física III Apuntes", Career::Gastronomy, Some(200)),
        ];

        let view = derive_view(
            &materials,
            CareerFilter::Only(Career::SoftwareEngineering),
            "física",
        );
        assert_eq!(ids(&view), vec!["a"]);
    }

    #[test]
    fn test_sort_descending_missing_timestamp_last() {
        let materials = vec![
            material("fifty", "x", Career::Mechatronics, Some(50)),
            material("none", "x", Career::Mechatronics, None),
            material("hundred-fifty", "x", Career::Mechatronics, Some(150)),
        ];

        let view = derive_view(&materials, CareerFilter::All, "");
        assert_eq!(ids(&view), vec!["hundred-fifty", "fifty", "none"]);
    }

    #[test]
    fn test_empty_search_matches_all() {
        let materials = vec![
            material("a", "Cálculo", Career::RenewableEnergy, Some(1)),
            material("b", "Álgebra", Career::Gastronomy, Some(2)),
        ];
        assert_eq!(derive_view(&materials, CareerFilter::All, "").len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let materials = vec![
            material("a", "GUÍA DE COCINA", Career::Gastronomy, Some(1)),
            material("b", "Manual de soldadura", Career::IndustrialMaintenance, Some(2)),
        ];
        let view = derive_view(&materials, CareerFilter::All, "guía");
        assert_eq!(ids(&view), vec!["a"]);
    }

    #[test]
    fn test_equal_timestamps_keep_backend_order() {
        let materials = vec![
            material("first", "x", Career::Gastronomy, None),
            material("second", "x", Career::Gastronomy, None),
            material("third", "x", Career::Gastronomy, Some(0)),
        ];
        let view = derive_view(&materials, CareerFilter::All, "");
        assert_eq!(ids(&view), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_pure_and_idempotent() {
        let materials = vec![
            material("a", "Redes", Career::SoftwareEngineering, Some(10)),
            material("b", "Redes II", Career::SoftwareEngineering, Some(20)),
            material("c", "Costos", Career::BusinessDevelopment, Some(30)),
        ];
        let before = materials.clone();

        let first = derive_view(&materials, CareerFilter::Only(Career::SoftwareEngineering), "redes");
        let second = derive_view(&materials, CareerFilter::Only(Career::SoftwareEngineering), "redes");

        assert_eq!(first, second);
        assert_eq!(materials, before);
        assert_eq!(ids(&first), vec!["b", "a"]);
    }

    #[test]
    fn test_view_is_subsequence_matching_both_predicates() {
        let careers = [Career::Gastronomy, Career::Mechatronics, Career::RenewableEnergy];
        let titles = ["Apuntes", "apuntes finales", "Examen", "Guía de APUNTES"];
        let mut materials = Vec::new();
        for i in 0..24 {
            let seconds = if i % 5 == 0 { None } else { Some((i * 37 % 11) as i64) };
            materials.push(material(
                &format!("m{i}"),
                titles[i % titles.len()],
                careers[i % careers.len()],
                seconds,
            ));
        }

        for filter in [CareerFilter::All, CareerFilter::Only(Career::Mechatronics)] {
            let view = derive_view(&materials, filter, "APUNTES");

            let expected: Vec<&Material> = materials
                .iter()
                .filter(|m| filter.matches(m.career) && m.title.to_lowercase().contains("apuntes"))
                .collect();
            assert_eq!(view.len(), expected.len());
            assert!(view.iter().all(|m| expected.iter().any(|e| e.id == m.id)));

            for pair in view.windows(2) {
                assert!(sort_key(&pair[0]) >= sort_key(&pair[1]));
            }
        }
    }
}
