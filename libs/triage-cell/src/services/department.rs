//! Symptom-to-department routing.

use shared_models::{find_department, DepartmentRef};

use super::rules::{first_match, Predicate, Rule};

const PAIN: &[&str] = &["agri"];

/// Department rules in priority order; the first match wins.
///
/// Cardiology stays first: chest and breathing complaints belong there even
/// though they also trip the safety classifier.
pub const DEPARTMENT_RULES: &[Rule] = &[
    Rule::new(
        "kardiyoloji",
        Predicate::Any(&[
            Predicate::All(&[
                Predicate::AnyOf(&["gogus", "gogsum"]),
                Predicate::AnyOf(&["agri", "baski", "sikisma"]),
            ]),
            Predicate::Contains("kalp carpinti"),
            Predicate::All(&[
                Predicate::Contains("nefes"),
                Predicate::AnyOf(&["darl", "zor", "zorlan", "alam", "yetmiyor", "tikan"]),
            ]),
        ]),
    ),
    Rule::new(
        "kbb",
        Predicate::Any(&[
            Predicate::All(&[Predicate::Contains("bogaz"), Predicate::AnyOf(&["agri", "yan"])]),
            Predicate::All(&[
                Predicate::Contains("kulak"),
                Predicate::AnyOf(&["agri", "akinti", "tikan"]),
            ]),
            Predicate::All(&[Predicate::Contains("burun"), Predicate::Contains("tikan")]),
            Predicate::AnyOf(&["sinuzit", "geniz akinti", "ses kisik"]),
        ]),
    ),
    Rule::new(
        "gastro",
        Predicate::Any(&[
            Predicate::All(&[
                Predicate::Contains("mide"),
                Predicate::AnyOf(&["agri", "bulant", "eksime", "yanma"]),
            ]),
            Predicate::All(&[
                Predicate::Contains("karin"),
                Predicate::AnyOf(&["agri", "siskin"]),
            ]),
            Predicate::AnyOf(&["ishal", "kabiz", "reflu", "gaz sanci"]),
        ]),
    ),
    Rule::new(
        "dermatoloji",
        Predicate::AnyOf(&[
            "dokuntu", "kizin", "kasin", "egzama", "akne", "sivilce", "kurdesen", "mant",
        ]),
    ),
    Rule::new(
        "uroloji",
        Predicate::Any(&[
            Predicate::All(&[
                Predicate::Contains("idrar"),
                Predicate::AnyOf(&["yan", "yakarak", "zor", "kanli"]),
            ]),
            Predicate::All(&[Predicate::Contains("bobrek"), Predicate::AnyOf(&["agri", "tas"])]),
        ]),
    ),
    Rule::new(
        "noroloji",
        Predicate::Any(&[
            Predicate::Contains("migren"),
            Predicate::All(&[Predicate::Contains("bas"), Predicate::AnyOf(&["agri", "don"])]),
            Predicate::AnyOf(&["uyusma", "nobet", "kasilma", "titreme"]),
        ]),
    ),
    Rule::new(
        "ortopedi",
        Predicate::Any(&[
            Predicate::AnyOf(&["diz", "omuz", "dirsek", "bilek", "ayak bilegi"]),
            Predicate::All(&[Predicate::AnyOf(&["bel", "boyun"]), Predicate::AnyOf(PAIN)]),
            Predicate::AnyOf(&["kirilma", "cikik", "burkul", "kas yirt", "kas zorlan"]),
        ]),
    ),
    Rule::new(
        "dahiliye",
        Predicate::AnyOf(&[
            "ates", "halsiz", "yorgunluk", "usume titreme", "soguk algin", "grip",
        ]),
    ),
];

/// Route normalized text to the first matching department.
///
/// Pure and deterministic; `None` when no rule fires.
pub fn route(normalized: &str) -> Option<DepartmentRef> {
    let rule = first_match(DEPARTMENT_RULES, normalized)?;
    find_department(rule.label).map(DepartmentRef::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::normalizer::normalize;
    use shared_models::DEPARTMENTS;

    fn code(raw: &str) -> Option<String> {
        route(&normalize(raw)).map(|d| d.code)
    }

    #[test]
    fn every_rule_names_a_catalogued_department() {
        for rule in DEPARTMENT_RULES {
            assert!(find_department(rule.label).is_some(), "{}", rule.label);
        }
        assert_eq!(DEPARTMENT_RULES.len(), DEPARTMENTS.len());
    }

    #[test]
    fn routes_representative_complaints() {
        let cases = [
            ("Kalp çarpıntım var", "kardiyoloji"),
            ("Boğazım yanıyor", "kbb"),
            ("Kulak ağrım var", "kbb"),
            ("Burun tıkanıklığı geçmiyor", "kbb"),
            ("Mide bulantısı var", "gastro"),
            ("Sürekli ishal oluyorum", "gastro"),
            ("Kollarımda kızarıklık ve kaşıntı", "dermatoloji"),
            ("İdrar yaparken yanma var", "uroloji"),
            ("Böbrek taşı şüphesi", "uroloji"),
            ("Migren ataklarım arttı", "noroloji"),
            ("Başım dönüyor", "noroloji"),
            ("Dizimde ağrı var", "ortopedi"),
            ("Belim ağrıyor", "ortopedi"),
            ("Ayak bileğim şişti", "ortopedi"),
            ("Ateşim var ve halsizim", "dahiliye"),
        ];
        for (text, expected) in cases {
            assert_eq!(code(text).as_deref(), Some(expected), "{}", text);
        }
    }

    #[test]
    fn cardiology_wins_over_later_rules() {
        // "bas" + "agri" would also satisfy neurology.
        assert_eq!(code("Göğüs ağrısı ve baş ağrısı").as_deref(), Some("kardiyoloji"));
    }

    #[test]
    fn ambiguous_text_has_no_department() {
        assert_eq!(code("merhaba, nasılsınız"), None);
        assert_eq!(code(""), None);
    }

    #[test]
    fn route_returns_display_name() {
        let department = route(&normalize("dizimde ağrı var")).unwrap();
        assert_eq!(department.name, "Ortopedi / Fizik Tedavi");
    }
}
