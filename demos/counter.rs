//! Counter application demonstrating stores, reducers and subscriptions

use std::collections::HashMap;
use std::sync::Arc;

use relay::{bind_action_creator, combine_reducers, create_store, SliceMap, SliceReducer};

#[derive(Clone, Debug)]
enum Action {
    Increment,
    Decrement,
    Rename(String),
}

fn main() {
    println!("=== Counter Store ===\n");

    // Two independent slices of state: a counter and a label
    let count: SliceReducer<CounterSlice, Action> = Box::new(|slice, action| {
        let slice = slice.unwrap_or_else(|| Arc::new(CounterSlice::Count(0)));
        let value = match *slice {
            CounterSlice::Count(value) => value,
            _ => return slice,
        };
        match action {
            Action::Increment => Arc::new(CounterSlice::Count(value + 1)),
            Action::Decrement => Arc::new(CounterSlice::Count(value - 1)),
            Action::Rename(_) => slice,
        }
    });
    let label: SliceReducer<CounterSlice, Action> = Box::new(|slice, action| {
        let slice = slice.unwrap_or_else(|| Arc::new(CounterSlice::Label("counter".into())));
        match action {
            Action::Rename(name) => Arc::new(CounterSlice::Label(name.clone())),
            _ => slice,
        }
    });

    let mut reducers = HashMap::new();
    reducers.insert("count".to_string(), count);
    reducers.insert("label".to_string(), label);

    let store = create_store(combine_reducers(reducers), SliceMap::new(), None);

    println!("1. Subscribing an observer");
    let observer = store.clone();
    let subscription = store.subscribe(move || {
        let state = observer.get_state();
        println!("   [state] {:?} {:?}", state["label"], state["count"]);
    });

    println!("2. Dispatching actions");
    store.dispatch(Action::Increment);
    store.dispatch(Action::Increment);
    store.dispatch(Action::Rename("visits".to_string()));
    store.dispatch(Action::Decrement);

    println!("3. Binding an action creator");
    let rename = bind_action_creator(Action::Rename, store.dispatcher());
    rename("hits".to_string());

    println!("4. Unsubscribing; further dispatches are silent");
    subscription.unsubscribe();
    store.dispatch(Action::Increment);

    let final_state = store.get_state();
    println!("\nFinal state: {:?}", final_state);
}

#[derive(Debug)]
enum CounterSlice {
    Count(i64),
    Label(String),
}
