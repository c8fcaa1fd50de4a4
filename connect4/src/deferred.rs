/// Continuation receiving the result of a [`Deferred`].
pub type Callback<T> = Box<dyn FnOnce(T)>;

/// A one-shot continuation: a value that may not exist yet.
///
/// The producer receives the consumer's callback and must invoke it exactly
/// once, on the thread driving the game. It may do so immediately (a
/// synchronous player) or park the callback until some later event supplies
/// the value (a player waiting for input).
pub struct Deferred<T> {
    start: Box<dyn FnOnce(Callback<T>)>,
}

impl<T: 'static> Deferred<T> {
    pub fn new(start: impl FnOnce(Callback<T>) + 'static) -> Self {
        Self {
            start: Box::new(start),
        }
    }

    /// Already resolved.
    pub fn ready(value: T) -> Self {
        Self::new(move |callback| callback(value))
    }

    /// Hand the continuation to the producer.
    pub fn then(self, callback: impl FnOnce(T) + 'static) {
        (self.start)(Box::new(callback))
    }

    pub fn map<U: 'static>(self, f: impl FnOnce(T) -> U + 'static) -> Deferred<U> {
        Deferred::new(move |callback| self.then(move |value| callback(f(value))))
    }
}
