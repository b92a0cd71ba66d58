// implemented by components holding channel subscriptions; the closures keep an Rc to the
// component alive, so the chain has to be broken by hand on teardown
pub trait Destroyable {
    fn destroy(&mut self);
}
