//! Integration tests for Stowage

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;
use stowage::{
    subscribe_selector, subscribe_to_actions, ActionMap, Store, StoreConfig, TransitionEvent,
};

#[derive(Clone, Debug, PartialEq)]
struct Profile {
    name: String,
    age: u32,
}

#[derive(Clone, Debug)]
enum Edit {
    Name(String),
    Age(u32),
    Nothing,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn profile_store() -> Store<Profile, Edit> {
    init_tracing();
    Store::with_config(
        Profile {
            name: "Jane Doe".to_string(),
            age: 32,
        },
        ActionMap::<Profile, Edit>::new()
            .try_draft("changeName", |draft, edit| match edit {
                Edit::Name(name) => {
                    draft.name = name;
                    Ok(())
                }
                other => Err(format!("changeName expects a name, got {other:?}")),
            })
            .try_draft("changeAge", |draft, edit| match edit {
                Edit::Age(age) => {
                    draft.age = age;
                    Ok(())
                }
                other => Err(format!("changeAge expects an age, got {other:?}")),
            })
            .draft("triggerSomeAction", |draft, _| {
                draft.name = "Grant".to_string();
            }),
        StoreConfig::default().with_label("profile"),
    )
}

fn counter() -> Rc<Cell<usize>> {
    Rc::new(Cell::new(0))
}

fn bump(calls: &Rc<Cell<usize>>) -> impl Fn(&Rc<Profile>) {
    let calls = Rc::clone(calls);
    move |_: &Rc<Profile>| calls.set(calls.get() + 1)
}

#[test]
fn initial_read() {
    let store = profile_store();
    assert_eq!(
        *store.current_state(),
        Profile {
            name: "Jane Doe".to_string(),
            age: 32
        }
    );
}

#[test]
fn dispatch_applies_handler() {
    let store = profile_store();
    let names = Rc::new(RefCell::new(Vec::new()));
    let age_calls = counter();

    let name = subscribe_selector(&store, |s: &Profile| s.name.clone(), {
        let names = names.clone();
        move |name| names.borrow_mut().push(name)
    });
    let age = subscribe_selector(&store, |s: &Profile| s.age, {
        let age_calls = age_calls.clone();
        move |_| age_calls.set(age_calls.get() + 1)
    });

    store
        .dispatch("changeName", Edit::Name("Susan".to_string()))
        .unwrap();

    assert_eq!(store.current_state().name, "Susan");
    assert_eq!(store.current_state().age, 32);
    assert_eq!(*names.borrow(), vec!["Susan".to_string()]);
    assert_eq!(age_calls.get(), 0);
    assert_eq!(name.current(), "Susan");
    assert_eq!(age.current(), 32);
}

#[test]
fn bound_actions_update_selected_data() {
    let store = profile_store();
    let change_name = store.bind("changeName");
    let change_age = store.bind("changeAge");

    let name = store.select(|s: &Profile| s.name.clone(), |_| {});
    let age = store.select(|s: &Profile| s.age, |_| {});

    assert_eq!(name.current(), "Jane Doe");
    change_name.dispatch(Edit::Name("Susan Duffy".to_string())).unwrap();
    assert_eq!(name.current(), "Susan Duffy");

    assert_eq!(age.current(), 32);
    change_age.dispatch(Edit::Age(47)).unwrap();
    assert_eq!(age.current(), 47);
}

#[test]
fn unknown_action_is_a_noop() {
    let store = profile_store();
    let before = store.current_state();

    store.dispatch("doOtherThing", Edit::Nothing).unwrap();

    assert!(Rc::ptr_eq(&before, &store.current_state()));
}

#[test]
fn action_filter_exactness() {
    let store = profile_store();
    let calls = counter();
    let _effect = subscribe_to_actions(&store, ["changeName", "changeAge"], bump(&calls));

    store
        .dispatch("changeName", Edit::Name("Susan".to_string()))
        .unwrap();
    assert_eq!(calls.get(), 1);

    store.dispatch("changeAge", Edit::Age(47)).unwrap();
    assert_eq!(calls.get(), 2);

    store.dispatch("doOtherThing", Edit::Nothing).unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn single_action_effect_sees_new_state() {
    let store = profile_store();
    let last = Rc::new(RefCell::new(None));

    let _effect = store.on_actions("changeName", {
        let last = last.clone();
        move |state: &Rc<Profile>| *last.borrow_mut() = Some((**state).clone())
    });
    let others = counter();
    let _other = store.on_actions("changeAge", bump(&others));

    store
        .dispatch("changeName", Edit::Name("Susan Doe".to_string()))
        .unwrap();

    assert_eq!(
        *last.borrow(),
        Some(Profile {
            name: "Susan Doe".to_string(),
            age: 32
        })
    );
    assert_eq!(others.get(), 0);
}

#[test]
fn handler_failure_rolls_back() {
    let store = profile_store();
    let calls = counter();
    let _all = store.subscribe({
        let calls = calls.clone();
        move |_| calls.set(calls.get() + 1)
    });
    let before = store.current_state();

    let err = store.dispatch("changeAge", Edit::Nothing).unwrap_err();

    assert_eq!(err.action(), "changeAge");
    assert!(Rc::ptr_eq(&before, &store.current_state()));
    assert_eq!(*before, *store.current_state());
    assert_eq!(calls.get(), 0);
}

#[test]
fn reentrant_dispatch_is_safe() {
    let store = profile_store();
    let seen = Rc::new(RefCell::new(Vec::new()));

    // Reacts to a rename by also changing the age.
    let _chain = store.on_actions("changeName", {
        let store = store.clone();
        move |_| {
            store.dispatch("changeAge", Edit::Age(40)).unwrap();
        }
    });
    let _log = store.subscribe({
        let seen = seen.clone();
        move |event: &TransitionEvent<Profile>| {
            seen.borrow_mut()
                .push((event.action_name.to_string(), event.new_state.age));
        }
    });

    store
        .dispatch("changeName", Edit::Name("Susan".to_string()))
        .unwrap();

    // The nested dispatch is delivered first, then the outer event, once each.
    assert_eq!(
        *seen.borrow(),
        vec![("changeAge".to_string(), 40), ("changeName".to_string(), 32)]
    );
    assert_eq!(store.current_state().age, 40);
    assert_eq!(store.current_state().name, "Susan");
}

#[test]
fn selector_behind_reentrant_effect_keeps_latest_value() {
    let store = profile_store();
    let deliveries = Rc::new(RefCell::new(Vec::new()));

    let _chain = store.on_actions("changeName", {
        let store = store.clone();
        move |_| {
            store.dispatch("changeAge", Edit::Age(40)).unwrap();
        }
    });
    let age = store.select(|s: &Profile| s.age, {
        let deliveries = deliveries.clone();
        move |age| deliveries.borrow_mut().push(age)
    });

    store
        .dispatch("changeName", Edit::Name("Susan".to_string()))
        .unwrap();

    assert_eq!(store.current_state().age, 40);
    assert_eq!(age.current(), 40);
    assert_eq!(*deliveries.borrow(), vec![40]);
}

#[test]
fn subscribe_during_dispatch_waits_for_next_one() {
    let store = profile_store();
    let late_calls = counter();
    let late = Rc::new(RefCell::new(Vec::new()));

    let _spawner = store.on_actions("triggerSomeAction", {
        let store = store.clone();
        let late = late.clone();
        let late_calls = late_calls.clone();
        move |_| {
            let sub = store.on_actions("triggerSomeAction", bump(&late_calls));
            late.borrow_mut().push(sub);
        }
    });

    store
        .dispatch("triggerSomeAction", Edit::Nothing)
        .unwrap();
    assert_eq!(late_calls.get(), 0);

    store
        .dispatch("triggerSomeAction", Edit::Nothing)
        .unwrap();
    assert_eq!(late_calls.get(), 1);
}

#[test]
fn teardown_removes_every_listener() {
    let store = profile_store();

    let name = store.select(|s: &Profile| s.name.clone(), |_| {});
    let effect = store.on_actions("changeAge", |_| {});
    assert_eq!(store.listener_count(), 2);

    name.unsubscribe();
    drop(effect);
    assert_eq!(store.listener_count(), 0);
}

#[derive(Clone, Debug)]
enum Op {
    SetA(u8),
    SetB(u8),
    Unknown,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..4).prop_map(Op::SetA),
        (0u8..4).prop_map(Op::SetB),
        Just(Op::Unknown),
    ]
}

proptest! {
    #[test]
    fn selector_fires_iff_selected_value_changes(ops in proptest::collection::vec(op(), 0..40)) {
        #[derive(Clone, Debug, PartialEq)]
        struct Pair {
            a: u8,
            b: u8,
        }

        let store: Store<Pair, u8> = Store::new(
            Pair { a: 0, b: 0 },
            ActionMap::<Pair, u8>::new()
                .draft("setA", |draft, v| {
                    if draft.a != v {
                        draft.a = v;
                    }
                })
                .draft("setB", |draft, v| {
                    if draft.b != v {
                        draft.b = v;
                    }
                }),
        );

        let delivered = Rc::new(RefCell::new(Vec::new()));
        let _a = store.select(|p: &Pair| p.a, {
            let delivered = delivered.clone();
            move |a| delivered.borrow_mut().push(a)
        });

        let mut expected = Vec::new();
        let mut previous = 0u8;
        for op in &ops {
            match op {
                Op::SetA(v) => store.dispatch("setA", *v).unwrap(),
                Op::SetB(v) => store.dispatch("setB", *v).unwrap(),
                Op::Unknown => store.dispatch("noSuchAction", 0).unwrap(),
            };
            let current = store.current_state().a;
            if current != previous {
                expected.push(current);
            }
            previous = current;
        }

        prop_assert!(delivered.borrow().len() <= ops.len());
        prop_assert_eq!(&*delivered.borrow(), &expected);
    }
}
