use crate::{
    key::{KeyAlternative, KeyEncodeError},
    obs::sink::{self, MetricsEvent},
};

///
/// AlternativeVisitor
///
/// A generic operation that can be instantiated for any one payload type
/// of a closed alternative list. The dispatcher calls `visit` exactly once,
/// bound to the type at the requested position.
///

pub trait AlternativeVisitor {
    type Output;

    fn visit<T: KeyAlternative>(self, position: u8) -> Self::Output;
}

///
/// AlternativeList
///
/// A closed, ordered list of payload types, expressed as a tuple.
/// Implemented for tuples of one to seven `KeyAlternative` types; an
/// eighth alternative has no implementation and fails to compile.
///

pub trait AlternativeList {
    const LEN: usize;

    /// Invoke `visitor` with the payload type at `index`.
    fn visit_at<V: AlternativeVisitor>(index: usize, visitor: V)
    -> Result<V::Output, KeyEncodeError>;
}

/// Invoke `visitor` with the payload type at `index` of the list `L`.
///
/// An out-of-range index fails with `InvalidDispatchIndex` before the
/// visitor runs, so the caller observes no partial effect.
pub fn dispatch<L, V>(index: usize, visitor: V) -> Result<V::Output, KeyEncodeError>
where
    L: AlternativeList,
    V: AlternativeVisitor,
{
    let result = L::visit_at(index, visitor);
    if result.is_err() {
        sink::record(MetricsEvent::DispatchRejected);
    }

    result
}

macro_rules! impl_alternative_list {
    ( $len:literal; $( $pos:literal => $ty:ident ),+ ) => {
        impl<$( $ty: KeyAlternative ),+> AlternativeList for ( $( $ty, )+ ) {
            const LEN: usize = $len;

            fn visit_at<V: AlternativeVisitor>(
                index: usize,
                visitor: V,
            ) -> Result<V::Output, KeyEncodeError> {
                match index {
                    $( $pos => Ok(visitor.visit::<$ty>($pos)), )+
                    _ => Err(KeyEncodeError::InvalidDispatchIndex {
                        index,
                        alternatives: Self::LEN,
                    }),
                }
            }
        }
    };
}

impl_alternative_list!(1; 0 => A);
impl_alternative_list!(2; 0 => A, 1 => B);
impl_alternative_list!(3; 0 => A, 1 => B, 2 => C);
impl_alternative_list!(4; 0 => A, 1 => B, 2 => C, 3 => D);
impl_alternative_list!(5; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E);
impl_alternative_list!(6; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F);
impl_alternative_list!(7; 0 => A, 1 => B, 2 => C, 3 => D, 4 => E, 5 => F, 6 => G);

///
/// AlternativeInfo
///
/// Static facts about one resolved alternative.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AlternativeInfo {
    pub position: u8,
    pub type_name: &'static str,
}

///
/// ResolveAlternative
///
/// Visitor that resolves a runtime position into its static facts.
///

pub(crate) struct ResolveAlternative;

impl AlternativeVisitor for ResolveAlternative {
    type Output = AlternativeInfo;

    fn visit<T: KeyAlternative>(self, position: u8) -> Self::Output {
        AlternativeInfo {
            position,
            type_name: T::TYPE_NAME,
        }
    }
}
