use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use std::io;

use super::frame::Frame;

/// Codec for cutting a byte stream into fixed-size frames
///
/// Frames carry no length prefix or delimiter, so the decoder simply waits for
/// `N` bytes and splits them off.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameCodec<const N: usize>;

impl<const N: usize> FrameCodec<N> {
    /// Creates a new frame codec
    pub fn new() -> Self {
        FrameCodec
    }
}

impl<const N: usize> Decoder for FrameCodec<N> {
    type Item = Frame<N>;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < N {
            // Need more data to read a full frame
            src.reserve(N - src.len());
            return Ok(None);
        }

        let frame_bytes = src.split_to(N);
        Frame::from_slice(&frame_bytes)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl<const N: usize> Encoder<Frame<N>> for FrameCodec<N> {
    type Error = io::Error;

    fn encode(&mut self, item: Frame<N>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(N);
        dst.put_slice(item.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_waits_for_full_frame() {
        let mut codec = FrameCodec::<4>::new();
        let mut buf = BytesMut::from(&[5u8, 0, 1][..]);

        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);

        buf.put_u8(9);
        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(frame.into_bytes(), [5, 0, 1, 9]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_splits_back_to_back_frames() {
        let mut codec = FrameCodec::<4>::new();
        let mut buf = BytesMut::from(&[2u8, 0, 0, 1, 3, 1, 0, 2, 4][..]);

        let first = codec.decode(&mut buf).unwrap().unwrap();
        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.id(), 2);
        assert_eq!(second.id(), 3);
        assert_eq!(second.seq(), 1);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(&buf[..], &[4]);
    }

    #[test]
    fn test_encode_writes_raw_bytes() {
        let mut codec = FrameCodec::<4>::new();
        let mut buf = BytesMut::new();

        codec.encode(Frame::from_bytes([7, 1, 1, 0]), &mut buf).unwrap();
        assert_eq!(&buf[..], &[7, 1, 1, 0]);
    }
}
