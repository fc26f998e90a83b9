use ndarray::ArrayView3;

/// Order of the colour channels within each pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// A decoded image: contiguous 3-channel bytes in row-major order.
///
/// Produced by an [`ImageDecoder`](crate::capture::domain::image_decoder::ImageDecoder)
/// and handed to the capture scorer; the core never inspects pixels itself.
#[derive(Clone, Debug)]
pub struct FaceImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
    order: ChannelOrder,
}

impl FaceImage {
    pub const CHANNELS: usize = 3;

    pub fn new(data: Vec<u8>, width: u32, height: u32, order: ChannelOrder) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * Self::CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            order,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    /// Swaps the first and third channel of every pixel when `order` differs.
    pub fn into_order(mut self, order: ChannelOrder) -> Self {
        if self.order != order {
            for pixel in self.data.chunks_exact_mut(Self::CHANNELS) {
                pixel.swap(0, 2);
            }
            self.order = order;
        }
        self
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, Self::CHANNELS),
            &self.data,
        )
        .expect("FaceImage data length must match dimensions")
    }
}
