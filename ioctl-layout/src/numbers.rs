use crate::{CType, Layout};

macro_rules! impl_ctype_num {
    ($($t:ty,)+) => {
        $(
        impl CType for $t {
            const LAYOUT: Layout = Layout::of::<$t>();
        }
         )+
    };
}

impl_ctype_num!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64,);
