//! Properties of next-step selection across a spread of card shapes
//!
//! Each property is checked against every fixture card, including cards with
//! no checklists, fully completed checklists and unsorted positions.

use next_step::checklist::{
    select, AnnotatedStep, CardChecklists, Checklist, ChecklistItem, ItemState, Mode,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn item(name: &str, position: f64, done: bool) -> ChecklistItem {
    let state = if done {
        ItemState::Complete
    } else {
        ItemState::Incomplete
    };
    ChecklistItem::new(name, position, state)
}

/// The card from the product documentation
fn documented_card() -> Vec<Checklist> {
    let json = r#"{"checklists": [
        {"name": "Setup", "pos": 1, "checkItems": [
            {"name": "Install", "pos": 1, "state": "complete"},
            {"name": "Configure", "pos": 2, "state": "incomplete"}
        ]},
        {"name": "Launch", "pos": 2, "checkItems": [
            {"name": "Deploy", "pos": 1, "state": "incomplete"}
        ]}
    ]}"#;
    CardChecklists::from_json_str(json).unwrap().checklists
}

fn fixtures() -> Vec<Vec<Checklist>> {
    vec![
        documented_card(),
        Vec::new(),
        vec![Checklist::new("Empty", 1.0, Vec::new())],
        vec![Checklist::new(
            "Done",
            1.0,
            vec![item("a", 1.0, true), item("b", 2.0, true)],
        )],
        vec![
            Checklist::new(
                "Review",
                65536.0,
                vec![
                    item("sign off", 3.0, false),
                    item("read diff", 1.0, false),
                    item("run tests", 2.0, true),
                ],
            ),
            Checklist::new("Prep", 16384.0, vec![item("branch", 8.0, false)]),
            Checklist::new("Ship", 32768.0, vec![item("tag", 1.0, true)]),
        ],
        vec![
            Checklist::new("Same", 1.0, vec![item("x", 1.0, false)]),
            Checklist::new("Same", 1.0, vec![item("y", 1.0, false)]),
        ],
    ]
}

fn incomplete_count(checklists: &[Checklist]) -> usize {
    checklists
        .iter()
        .flat_map(|c| c.items.iter())
        .filter(|i| i.is_incomplete())
        .count()
}

fn names(steps: &[AnnotatedStep]) -> Vec<&str> {
    steps.iter().map(|s| s.name.as_str()).collect()
}

// ─── Documented Example ──────────────────────────────────────────────────────

#[test]
fn documented_example() {
    let card = documented_card();

    assert_eq!(names(&select(Mode::OnePerCard, &card)), ["Configure"]);
    assert_eq!(
        names(&select(Mode::OnePerChecklist, &card)),
        ["Setup: Configure", "Launch: Deploy"]
    );
    assert_eq!(
        names(&select(Mode::DisplayAll, &card)),
        ["Setup: Configure", "Launch: Deploy"]
    );
    assert!(select(Mode::Hidden, &card).is_empty());
}

// ─── Properties ──────────────────────────────────────────────────────────────

#[test]
fn hidden_is_always_empty() {
    for card in fixtures() {
        assert!(select(Mode::Hidden, &card).is_empty());
    }
}

#[test]
fn one_per_card_is_first_of_display_all_without_prefix() {
    for card in fixtures() {
        let one = select(Mode::OnePerCard, &card);
        let all = select(Mode::DisplayAll, &card);

        if incomplete_count(&card) == 0 {
            assert!(one.is_empty());
            continue;
        }

        assert_eq!(one.len(), 1);
        let first = &all[0].name;
        let (prefix, rest) = first.split_once(": ").unwrap();
        assert!(card.iter().any(|c| c.name == prefix));
        assert_eq!(one[0].name, rest);
    }
}

#[test]
fn one_per_checklist_counts_checklists_with_work_left() {
    for card in fixtures() {
        let expected = card
            .iter()
            .filter(|c| c.items.iter().any(ChecklistItem::is_incomplete))
            .count();
        assert_eq!(select(Mode::OnePerChecklist, &card).len(), expected);
    }
}

#[test]
fn display_all_counts_every_incomplete_item() {
    for card in fixtures() {
        assert_eq!(
            select(Mode::DisplayAll, &card).len(),
            incomplete_count(&card)
        );
    }
}

#[test]
fn prefixed_modes_carry_checklist_names() {
    for card in fixtures() {
        for mode in [Mode::OnePerChecklist, Mode::DisplayAll] {
            for step in select(mode, &card) {
                assert!(
                    card.iter().any(|c| step.name.starts_with(&format!("{}: ", c.name))),
                    "{:?} lacks a checklist prefix",
                    step.name
                );
            }
        }
    }
}

#[test]
fn one_per_card_is_never_prefixed() {
    for card in fixtures() {
        for step in select(Mode::OnePerCard, &card) {
            assert!(card
                .iter()
                .all(|c| !step.name.starts_with(&format!("{}: ", c.name))));
        }
    }
}

#[test]
fn selection_is_idempotent() {
    for card in fixtures() {
        for mode in Mode::ALL {
            assert_eq!(select(mode, &card), select(mode, &card));
        }
    }
}

// ─── Ordering ────────────────────────────────────────────────────────────────

#[test]
fn unsorted_positions_are_ordered() {
    let card = &fixtures()[4];

    assert_eq!(names(&select(Mode::OnePerCard, card)), ["branch"]);
    assert_eq!(
        names(&select(Mode::OnePerChecklist, card)),
        ["Prep: branch", "Review: read diff"]
    );
    assert_eq!(
        names(&select(Mode::DisplayAll, card)),
        ["Prep: branch", "Review: read diff", "Review: sign off"]
    );
}

#[test]
fn equal_checklist_positions_keep_source_order() {
    let card = &fixtures()[5];
    assert_eq!(
        names(&select(Mode::DisplayAll, card)),
        ["Same: x", "Same: y"]
    );
}
