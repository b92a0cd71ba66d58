mod destroyable;
pub mod events;
pub mod game;
pub mod helpers;
pub mod model;

pub use destroyable::Destroyable;

#[cfg(test)]
pub(crate) mod tests {
    use std::future::Future;
    use std::sync::Once;
    use test_context::TestContext;

    static INIT_LOGGER: Once = Once::new();

    pub struct UsingLogger {
        _value: String,
    }

    impl TestContext for UsingLogger {
        fn setup() -> UsingLogger {
            INIT_LOGGER.call_once(|| {
                let _ = env_logger::builder().is_test(true).try_init();
            });

            UsingLogger {
                _value: "zennum".to_string(),
            }
        }

        fn teardown(self) {}
    }

    /// Runs `func` with a private main context pushed as the thread default, so
    /// spawned tasks never touch the process-wide default context.
    pub fn with_main_context<R>(func: impl FnOnce(&glib::MainContext) -> R) -> R {
        let context = glib::MainContext::new();
        context
            .with_thread_default(|| func(&context))
            .expect("fresh main context can always be acquired")
    }

    pub fn run_for(context: &glib::MainContext, duration: std::time::Duration) {
        context.block_on(glib::timeout_future(duration));
    }

    pub fn block_on<F: Future>(future: F) -> F::Output {
        with_main_context(|context| context.block_on(future))
    }
}
