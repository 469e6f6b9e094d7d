use bytes::{BufMut, BytesMut};

use crate::atom::Atom;

/// A primitive that can live in a typed buffer.
pub(crate) trait Element: Copy + Default {
    const WIDTH: usize;

    fn from_atom(atom: Atom) -> Self;
    fn to_atom(self) -> Atom;
    fn write(self, big_endian: bool, dst: &mut BytesMut);
    /// `src` holds at least `WIDTH` bytes.
    fn read(src: &[u8], big_endian: bool) -> Self;
}

macro_rules! element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                fn from_atom(atom: Atom) -> Self {
                    match atom {
                        Atom::Int(v) => v as $t,
                        Atom::Float(v) => v as $t,
                    }
                }

                fn to_atom(self) -> Atom {
                    Atom::from(self)
                }

                fn write(self, big_endian: bool, dst: &mut BytesMut) {
                    if big_endian {
                        dst.put_slice(&self.to_be_bytes());
                    } else {
                        dst.put_slice(&self.to_le_bytes());
                    }
                }

                fn read(src: &[u8], big_endian: bool) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(&src[..Self::WIDTH]);
                    if big_endian {
                        <$t>::from_be_bytes(raw)
                    } else {
                        <$t>::from_le_bytes(raw)
                    }
                }
            }
        )*
    };
}

element!(u8, i8, u16, i16, u32, i32, u64, i64, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_atoms_wrap() {
        assert_eq!(u8::from_atom(Atom::Int(300)), 44);
        assert_eq!(i8::from_atom(Atom::Int(200)), -56);
        assert_eq!(u16::from_atom(Atom::Int(-1)), u16::MAX);
        assert_eq!(f32::from_atom(Atom::Int(3)), 3.0);
    }

    #[test]
    fn float_atoms_truncate_and_saturate() {
        assert_eq!(i32::from_atom(Atom::Float(-2.7)), -2);
        assert_eq!(u8::from_atom(Atom::Float(300.0)), 255);
        assert_eq!(u8::from_atom(Atom::Float(-1.0)), 0);
        assert_eq!(i64::from_atom(Atom::Float(f64::NAN)), 0);
        assert_eq!(f64::from_atom(Atom::Float(0.125)), 0.125);
    }

    #[test]
    fn export_kinds() {
        assert_eq!(7u16.to_atom(), Atom::Int(7));
        assert_eq!(u64::MAX.to_atom(), Atom::Int(-1));
        assert_eq!(1.5f32.to_atom(), Atom::Float(1.5));
    }

    #[test]
    fn byte_orders() {
        let mut dst = BytesMut::new();
        0x0102_0304u32.write(true, &mut dst);
        0x0102_0304u32.write(false, &mut dst);
        assert_eq!(dst.as_ref(), &[1, 2, 3, 4, 4, 3, 2, 1]);
        assert_eq!(u32::read(&dst[..4], true), 0x0102_0304);
        assert_eq!(u32::read(&dst[4..], false), 0x0102_0304);
        assert_eq!(i16::read(&[0xFF, 0xFE], true), -2);
    }
}
