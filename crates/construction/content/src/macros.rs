/// Declares a domain's component enum and forwards every
/// [`construction_core::Component`] method to the wrapped part.
macro_rules! component_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident for $domain:ty {
            $($variant:ident($part:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        $vis enum $name {
            $($variant($part)),+
        }

        $(
            impl From<$part> for $name {
                fn from(part: $part) -> Self {
                    Self::$variant(part)
                }
            }
        )+

        impl construction_core::Component<$domain> for $name {
            fn kind(&self) -> <$domain as construction_core::Domain>::Kind {
                match self {
                    $(Self::$variant(part) => construction_core::Component::<$domain>::kind(part)),+
                }
            }

            fn base(&self) -> <$domain as construction_core::Domain>::Base {
                match self {
                    $(Self::$variant(part) => construction_core::Component::<$domain>::base(part)),+
                }
            }

            fn component_string(&self) -> String {
                match self {
                    $(Self::$variant(part) => {
                        construction_core::Component::<$domain>::component_string(part)
                    }),+
                }
            }

            fn instance_string(&self) -> String {
                match self {
                    $(Self::$variant(part) => {
                        construction_core::Component::<$domain>::instance_string(part)
                    }),+
                }
            }

            fn is_compatible(
                &self,
                sequence: Option<usize>,
                context: &construction_core::ContextView<'_, $domain>,
            ) -> bool {
                match self {
                    $(Self::$variant(part) => {
                        construction_core::Component::<$domain>::is_compatible(part, sequence, context)
                    }),+
                }
            }

            fn order_after(&self) -> &'static [<$domain as construction_core::Domain>::Kind] {
                match self {
                    $(Self::$variant(part) => {
                        construction_core::Component::<$domain>::order_after(part)
                    }),+
                }
            }

            fn options(
                &self,
            ) -> &[construction_core::ComponentOption<<$domain as construction_core::Domain>::OptionId>] {
                match self {
                    $(Self::$variant(part) => construction_core::Component::<$domain>::options(part)),+
                }
            }

            fn options_mut(
                &mut self,
            ) -> &mut [construction_core::ComponentOption<<$domain as construction_core::Domain>::OptionId>] {
                match self {
                    $(Self::$variant(part) => {
                        construction_core::Component::<$domain>::options_mut(part)
                    }),+
                }
            }

            fn update_options(
                &mut self,
                sequence: Option<usize>,
                context: &construction_core::ContextView<'_, $domain>,
            ) {
                match self {
                    $(Self::$variant(part) => {
                        construction_core::Component::<$domain>::update_options(part, sequence, context)
                    }),+
                }
            }

            fn create_steps(
                &self,
                sequence: Option<usize>,
                context: &mut construction_core::StepContext<'_, $domain>,
            ) -> Result<(), construction_core::ConstructionError> {
                match self {
                    $(Self::$variant(part) => {
                        construction_core::Component::<$domain>::create_steps(part, sequence, context)
                    }),+
                }
            }
        }
    };
}
