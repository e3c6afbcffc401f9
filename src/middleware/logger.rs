use std::fmt::Debug;
use std::sync::Arc;

use log::{debug, trace};

use crate::store::Dispatch;

use super::{Middleware, MiddlewareApi};

/// Middleware that logs every action at `debug` level before it reaches
/// the reducer, and the resulting state at `trace` level afterwards.
///
/// Emits through the `log` facade; wire up any logger implementation to
/// see the output.
pub fn logger<S, A>() -> Middleware<S, A>
where
    S: Debug + 'static,
    A: Debug + 'static,
{
    Box::new(|api: MiddlewareApi<S, A>| {
        Box::new(move |next: Dispatch<A>| {
            let api = api.clone();
            Arc::new(move |action: A| {
                debug!("dispatching {:?}", action);
                let result = next(action);
                trace!("state after dispatch: {:?}", api.get_state());
                result
            })
        })
    })
}
