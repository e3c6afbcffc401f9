use std::sync::Arc;

use crate::compose::{compose, Composable};
use crate::reducer::Reducer;
use crate::store::{Dispatch, Enhancer, StateReader, StoreCreator};

/// The slice of the store a middleware may talk to.
///
/// `dispatch` forwards to the store's *current* pipeline, so a
/// middleware that re-enters dispatch traverses the whole chain from the
/// top rather than only the links below itself.
pub struct MiddlewareApi<S, A> {
    get_state: StateReader<S>,
    dispatch: Dispatch<A>,
}

impl<S, A> MiddlewareApi<S, A> {
    /// Clone of the committed state.
    pub fn get_state(&self) -> S {
        (self.get_state)()
    }

    /// Send an action through the full dispatch chain.
    pub fn dispatch(&self, action: A) -> A {
        (self.dispatch)(action)
    }
}

impl<S, A> Clone for MiddlewareApi<S, A> {
    fn clone(&self) -> Self {
        Self {
            get_state: Arc::clone(&self.get_state),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

/// A middleware: maps the store API to a dispatch transformer.
///
/// The transformer receives the next dispatch in the chain and returns
/// the wrapped dispatch. Each middleware is applied exactly once, when
/// the enhancer builds the store.
pub type Middleware<S, A> =
    Box<dyn FnOnce(MiddlewareApi<S, A>) -> Composable<Dispatch<A>> + Send + Sync>;

/// Build an enhancer that installs the given middleware chain.
///
/// The first middleware in the vector is outermost: it sees the action
/// first on the way in and the result last on the way out, with the base
/// dispatch at the center.
pub fn apply_middleware<S, A>(middlewares: Vec<Middleware<S, A>>) -> Enhancer<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: 'static,
{
    Box::new(move |create_store: StoreCreator<S, A>| {
        Box::new(move |reducer: Reducer<S, A>, initial_state: S| {
            let store = create_store(reducer, initial_state);

            let api = MiddlewareApi {
                get_state: store.reader(),
                // Live handle: resolves to the final composed dispatch
                // once it is installed below.
                dispatch: store.dispatcher(),
            };

            let chain: Vec<Composable<Dispatch<A>>> = middlewares
                .into_iter()
                .map(|middleware| middleware(api.clone()))
                .collect();

            let dispatch = compose(chain)(store.current_dispatch());
            store.swap_dispatch(dispatch);

            store
        })
    })
}
