pub trait Serialize<'a> {
    /// Writes the serialized form into `buf` and optionally returns a borrowed
    /// tail that the sender appends after `buf` without copying.
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]>;
}
