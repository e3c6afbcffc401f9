//! Logging middleware demo
//!
//! Run with `RUST_LOG=debug` (or `trace` to see post-dispatch state).

use relay::{apply_middleware, create_store, logger, Reducer};

#[derive(Debug)]
enum Action {
    Deposit(i64),
    Withdraw(i64),
}

fn main() {
    env_logger::init();

    let reducer: Reducer<i64, Action> = Box::new(|balance, action| match action {
        Action::Deposit(amount) => balance + amount,
        Action::Withdraw(amount) => balance - amount,
    });

    let store = create_store(reducer, 0, Some(apply_middleware(vec![logger()])));

    store.dispatch(Action::Deposit(100));
    store.dispatch(Action::Withdraw(30));
    store.dispatch(Action::Deposit(5));

    println!("final balance: {}", store.get_state());
}
