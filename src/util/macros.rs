macro_rules! impl_num_enums {
    ($tname:ident, $nty:ident, $($vname:ident = $val:literal,)+) => {
        #[repr($nty)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $tname {
            $(
                $vname = $val,
             )+
        }

        impl std::convert::TryFrom<$nty> for $tname {
            type Error = $crate::Error;

            fn try_from(val: $nty) -> Result<Self, Self::Error> {
                Ok(match val {
                    $(
                        $val => $tname::$vname,
                     )+
                    other => return Err($crate::Error::InvalidData(format!("unexpected value {} for {}", other, stringify!($tname)).into())),
                })
            }
        }

        impl From<$tname> for $nty {
            fn from(v: $tname) -> $nty {
                v as $nty
            }
        }
    };
}

pub(crate) use impl_num_enums;
