//! Demonstration of a profile store with selectors and action effects

use std::cell::Cell;
use std::rc::Rc;

use stowage::{ActionMap, Store, StoreConfig};

#[derive(Clone, Debug)]
struct Profile {
    name: String,
    age: u32,
}

#[derive(Clone, Debug)]
enum Input {
    Text(String),
    Number(u32),
    None,
}

fn profile_store() -> Store<Profile, Input> {
    Store::with_config(
        Profile {
            name: "Grant".to_string(),
            age: 28,
        },
        ActionMap::<Profile, Input>::new()
            .try_draft("updateName", |draft, input| match input {
                Input::Text(name) => {
                    draft.name = name;
                    Ok(())
                }
                other => Err(format!("updateName expects text, got {other:?}")),
            })
            .try_draft("updateAge", |draft, input| match input {
                Input::Number(age) => {
                    draft.age = age;
                    Ok(())
                }
                other => Err(format!("updateAge expects a number, got {other:?}")),
            })
            .draft("triggerSomeAction", |draft, _| {
                draft.name = "Grant".to_string();
            }),
        StoreConfig::default().with_label("profile"),
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Store Example: Profile ===\n");

    let store = profile_store();

    // Header follows both fields
    println!("1. Setting up selectors");
    let header_name = store.select(|s: &Profile| s.name.clone(), |name| {
        println!("   [Header] name is now {name}");
    });
    let header_age = store.select(|s: &Profile| s.age, |age| {
        println!("   [Header] age is now {age}");
    });
    println!(
        "   Initial header: name is {}, age is {}",
        header_name.current(),
        header_age.current()
    );

    // Footer toggles whenever the header button fires
    let expanded = Rc::new(Cell::new(false));
    let _footer = store.on_actions("triggerSomeAction", {
        let expanded = expanded.clone();
        move |_| {
            expanded.set(!expanded.get());
            println!(
                "   [Footer] {}",
                if expanded.get() { "Expanded!" } else { "Collapsed!" }
            );
        }
    });

    println!("\n2. Typing a new name");
    let update_name = store.bind("updateName");
    for name in ["S", "Su", "Susan"] {
        update_name.dispatch(Input::Text(name.to_string())).unwrap();
    }

    println!("\n3. Changing age");
    store.dispatch("updateAge", Input::Number(47)).unwrap();

    println!("\n4. Pressing the header button twice");
    store.dispatch("triggerSomeAction", Input::None).unwrap();
    store.dispatch("triggerSomeAction", Input::None).unwrap();

    println!("\n5. Sending the wrong payload");
    if let Err(err) = store.dispatch("updateAge", Input::Text("old".to_string())) {
        println!("   rejected: {err}");
    }

    println!("\nFinal state: {:#?}", store.current_state());
    println!("\n✓ Example complete!");
}
