//! Generic route registration for actix-web.
//!
//! actix-web handlers cannot be generic, so [`route!`](crate::route) generates a `{Name}Route` service factory that
//! registers a monomorphised handler on a resource. Handlers are free async functions named `$name`, generic over one
//! type parameter per bound, in the order the bounds are listed.
//!
//! ```ignore
//! route!(payment => Post "/payment" impl WebhookSender, TaskRunner);
//! // ...
//! cfg.service(PaymentRoute::<W, T>::new());
//! ```
#[doc(hidden)]
pub use paste;

#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        $crate::routing::paste::paste! {
            pub struct [<$name:camel Route>]<$([<T $bounds:camel>],)+>($(core::marker::PhantomData<fn() -> [<T $bounds:camel>]>,)+);

            impl<$([<T $bounds:camel>],)+> [<$name:camel Route>]<$([<T $bounds:camel>],)+> {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self {
                    Self($(core::marker::PhantomData::<fn() -> [<T $bounds:camel>]>,)+)
                }
            }

            impl<$([<T $bounds:camel>],)+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
            where
                $([<T $bounds:camel>]: $bounds + 'static,)+
            {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let resource = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name::<$([<T $bounds:camel>],)+>);
                    actix_web::dev::HttpServiceFactory::register(resource, config);
                }
            }
        }
    };
}
