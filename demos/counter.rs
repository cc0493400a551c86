//! A counter store with a derived selector

use std::rc::Rc;

use stowage::{ActionMap, Store};

fn main() {
    println!("=== Store Example: Counter ===\n");

    let store: Store<i64> = Store::new(
        0,
        ActionMap::<i64>::new()
            .reducer("increment", |n, ()| Rc::new(**n + 1))
            .reducer("decrement", |n, ()| Rc::new(**n - 1)),
    );

    let doubled = store.select(|n: &i64| 2 * n, |value| {
        println!("   Value is {value}");
    });
    println!("Initial value is {}", doubled.current());

    let increment = store.bind("increment");
    let decrement = store.bind("decrement");

    increment.dispatch(()).unwrap();
    increment.dispatch(()).unwrap();
    decrement.dispatch(()).unwrap();

    println!("\nFinal count: {}", store.current_state());
}
