//! Simple containers to track images and perform operations on them.

use std::io::{Read, Write};

use thiserror::Error;

/// The largest pixel buffer any single image may occupy, 1 GiB.
const MAX_IMAGE_BYTES: u64 = 1 << 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Rgba8,
}

impl ImageFormat {
    fn stride(&self) -> u32 {
        match self {
            ImageFormat::Rgba8 => 4,
        }
    }

    fn buffer_len(&self, size: (u32, u32)) -> Option<u64> {
        u64::from(size.0)
            .checked_mul(u64::from(size.1))?
            .checked_mul(u64::from(self.stride()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Image {
    size: (u32, u32),
    data: Vec<u8>,
    format: ImageFormat,
}

impl Image {
    pub fn new_rgba8<D: Into<Vec<u8>>>(size: (u32, u32), data: D) -> Self {
        let data = data.into();
        let format = ImageFormat::Rgba8;

        assert!(Some(data.len() as u64) == format.buffer_len(size));

        Self { size, data, format }
    }

    /// Allocates a fully transparent image, refusing sizes whose pixel buffer
    /// would exceed `MAX_IMAGE_BYTES`.
    pub fn try_new_empty_rgba8(size: (u32, u32)) -> Result<Self, ImageError> {
        let format = ImageFormat::Rgba8;

        let len = format
            .buffer_len(size)
            .filter(|&len| len <= MAX_IMAGE_BYTES)
            .ok_or(ImageError::TooLarge { size })?;

        Ok(Self::new_rgba8(size, vec![0; len as usize]))
    }

    #[cfg(test)]
    pub fn new_empty_rgba8(size: (u32, u32)) -> Self {
        Self::try_new_empty_rgba8(size).unwrap()
    }

    /// Decodes a PNG of any color type and bit depth into 8-bit RGBA.
    pub fn decode_png<R: Read>(input: R) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(input);

        // Palettes, low bit depths and tRNS chunks get expanded, and 16-bit
        // channels cut down, leaving only the four 8-bit color types below.
        decoder
            .set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;

        let mut buffer = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buffer)?;
        buffer.truncate(info.buffer_size());

        if info.bit_depth != png::BitDepth::Eight {
            return Err(ImageError::UnsupportedPixelLayout {
                color_type: info.color_type,
                bit_depth: info.bit_depth,
            });
        }

        let data = match info.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => {
                expand_to_rgba(&buffer, 3, |px| [px[0], px[1], px[2], 255])
            }
            png::ColorType::GrayscaleAlpha => {
                expand_to_rgba(&buffer, 2, |px| [px[0], px[0], px[0], px[1]])
            }
            png::ColorType::Grayscale => {
                expand_to_rgba(&buffer, 1, |px| [px[0], px[0], px[0], 255])
            }
            color_type => {
                return Err(ImageError::UnsupportedPixelLayout {
                    color_type,
                    bit_depth: info.bit_depth,
                })
            }
        };

        Ok(Self::new_rgba8((info.width, info.height), data))
    }

    /// Decodes every frame of a GIF, in file order.
    ///
    /// Each frame is composited onto the GIF's logical screen the way a viewer
    /// would show it, so all returned images share the screen's size even when
    /// the file only stores the region that changed.
    pub fn decode_gif_frames<R: Read>(input: R) -> Result<Vec<Self>, ImageError> {
        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);

        let mut decoder = options.read_info(input)?;
        let screen_size = (u32::from(decoder.width()), u32::from(decoder.height()));

        let mut screen = Image::try_new_empty_rgba8(screen_size)?;
        let mut frames = Vec::new();

        while let Some(frame) = decoder.read_next_frame()? {
            let pos = (u32::from(frame.left), u32::from(frame.top));
            let size = (u32::from(frame.width), u32::from(frame.height));

            let restore_to = match frame.dispose {
                gif::DisposalMethod::Previous => Some(screen.clone()),
                _ => None,
            };

            screen.draw_over(&frame.buffer, size, pos);
            frames.push(screen.clone());

            match frame.dispose {
                gif::DisposalMethod::Background => screen.clear_rect(pos, size),
                gif::DisposalMethod::Previous => {
                    if let Some(previous) = restore_to {
                        screen = previous;
                    }
                }
                _ => {}
            }
        }

        Ok(frames)
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), ImageError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);

        match self.format {
            ImageFormat::Rgba8 => {
                encoder.set_color(png::ColorType::Rgba);
                encoder.set_depth(png::BitDepth::Eight);
            }
        }

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;
        output_writer.finish()?;

        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Copies `other` into this image unscaled, with its top-left corner at
    /// `pos`. Every pixel is replaced, including transparent ones.
    pub fn blit(&mut self, other: &Image, pos: (u32, u32)) -> Result<(), ImageError> {
        assert!(self.format == ImageFormat::Rgba8 && other.format == ImageFormat::Rgba8);

        let fits = |offset: u32, extent: u32, limit: u32| {
            u64::from(offset) + u64::from(extent) <= u64::from(limit)
        };

        if !fits(pos.0, other.size.0, self.size.0) || !fits(pos.1, other.size.1, self.size.1) {
            return Err(ImageError::OutOfBounds {
                pos,
                size: other.size,
                canvas: self.size,
            });
        }

        if other.size.0 == 0 || other.size.1 == 0 {
            return Ok(());
        }

        let stride = self.format.stride();

        let other_width_bytes = other.size.0 * stride;
        let other_rows = other.data.chunks_exact((other_width_bytes) as usize);

        for (other_y, other_row) in other_rows.enumerate() {
            let self_y = pos.1 + other_y as u32;

            let start_px = pos.0 + self.size.0 * self_y;

            let start_in_bytes = (stride * start_px) as usize;
            let end_in_bytes = start_in_bytes + other_row.len();

            let self_row = &mut self.data[start_in_bytes..end_in_bytes];
            self_row.copy_from_slice(other_row);
        }

        Ok(())
    }

    pub fn get_pixel(&self, pos: (u32, u32)) -> Pixel {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let stride = self.format.stride() as usize;
        let start = stride * (pos.0 + pos.1 * self.size.0) as usize;

        Pixel {
            r: self.data[start],
            g: self.data[start + 1],
            b: self.data[start + 2],
            a: self.data[start + 3],
        }
    }

    pub fn set_pixel(&mut self, pos: (u32, u32), pixel: Pixel) {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let stride = self.format.stride() as usize;
        let start = stride * (pos.0 + pos.1 * self.size.0) as usize;

        self.data[start] = pixel.r;
        self.data[start + 1] = pixel.g;
        self.data[start + 2] = pixel.b;
        self.data[start + 3] = pixel.a;
    }

    /// Draws raw RGBA pixels of the given size at `pos`, skipping fully
    /// transparent pixels and anything falling outside this image.
    fn draw_over(&mut self, rgba: &[u8], size: (u32, u32), pos: (u32, u32)) {
        for (index, px) in rgba.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }

            let index = index as u32;
            let x = pos.0 + index % size.0;
            let y = pos.1 + index / size.0;

            if x < self.size.0 && y < self.size.1 {
                self.set_pixel((x, y), Pixel::new(px[0], px[1], px[2], px[3]));
            }
        }
    }

    fn clear_rect(&mut self, pos: (u32, u32), size: (u32, u32)) {
        let x_end = (pos.0 + size.0).min(self.size.0);
        let y_end = (pos.1 + size.1).min(self.size.1);

        for y in pos.1..y_end {
            for x in pos.0..x_end {
                self.set_pixel((x, y), Pixel::new(0, 0, 0, 0));
            }
        }
    }
}

fn expand_to_rgba<F>(data: &[u8], channels: usize, convert: F) -> Vec<u8>
where
    F: Fn(&[u8]) -> [u8; 4],
{
    let mut output = Vec::with_capacity(data.len() / channels * 4);

    for px in data.chunks_exact(channels) {
        output.extend_from_slice(&convert(px));
    }

    output
}

#[derive(Debug, Error)]
pub(crate) enum ImageError {
    #[error(transparent)]
    PngDecode {
        #[from]
        source: png::DecodingError,
    },

    #[error(transparent)]
    PngEncode {
        #[from]
        source: png::EncodingError,
    },

    #[error(transparent)]
    GifDecode {
        #[from]
        source: gif::DecodingError,
    },

    #[error("Unsupported PNG pixel layout: {color_type:?} at {bit_depth:?}")]
    UnsupportedPixelLayout {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },

    #[error("A {}x{} image is too large to hold in memory", size.0, size.1)]
    TooLarge { size: (u32, u32) },

    #[error("A {size:?} image at {pos:?} does not fit inside a {canvas:?} canvas")]
    OutOfBounds {
        pos: (u32, u32),
        size: (u32, u32),
        canvas: (u32, u32),
    },
}

#[cfg(test)]
mod test {
    use super::*;

    const RED: Pixel = Pixel {
        r: 255,
        g: 0,
        b: 0,
        a: 255,
    };

    const BLUE: Pixel = Pixel {
        r: 0,
        g: 0,
        b: 255,
        a: 255,
    };

    const CLEAR: Pixel = Pixel {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    fn encode_raw_png(size: (u32, u32), color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();

        {
            let mut encoder = png::Encoder::new(&mut bytes, size.0, size.1);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }

        bytes
    }

    fn palette_frame(
        size: (u16, u16),
        pos: (u16, u16),
        pixels: &[u8],
        dispose: gif::DisposalMethod,
    ) -> gif::Frame<'static> {
        // Index 0 is red, 1 is blue, 2 is transparent.
        let palette = [255, 0, 0, 0, 0, 255, 0, 0, 0];

        let mut frame =
            gif::Frame::from_palette_pixels(size.0, size.1, pixels, &palette[..], Some(2));
        frame.left = pos.0;
        frame.top = pos.1;
        frame.dispose = dispose;
        frame
    }

    fn encode_gif(screen: (u16, u16), frames: &[gif::Frame<'static>]) -> Vec<u8> {
        let mut bytes = Vec::new();

        {
            let mut encoder = gif::Encoder::new(&mut bytes, screen.0, screen.1, &[]).unwrap();

            for frame in frames {
                encoder.write_frame(frame).unwrap();
            }
        }

        bytes
    }

    #[test]
    fn blit_zero() {
        let source = Image::new_empty_rgba8((17, 20));
        let mut target = Image::new_empty_rgba8((17, 20));

        target.blit(&source, (0, 0)).unwrap();
    }

    #[test]
    fn blit_corner() {
        let mut source = Image::new_empty_rgba8((4, 4));
        source.set_pixel((3, 3), RED);

        let mut target = Image::new_empty_rgba8((8, 8));
        target.blit(&source, (4, 4)).unwrap();

        assert_eq!(target.get_pixel((7, 7)), RED);
        assert_eq!(target.get_pixel((4, 4)), CLEAR);
    }

    #[test]
    fn blit_out_of_bounds() {
        let source = Image::new_empty_rgba8((4, 4));
        let mut target = Image::new_empty_rgba8((8, 8));

        match target.blit(&source, (5, 0)) {
            Err(ImageError::OutOfBounds { pos, size, canvas }) => {
                assert_eq!(pos, (5, 0));
                assert_eq!(size, (4, 4));
                assert_eq!(canvas, (8, 8));
            }
            other => panic!("expected OutOfBounds, got {:?}", other),
        }

        assert!(target.blit(&source, (0, 5)).is_err());
        assert!(target.blit(&source, (u32::MAX, 0)).is_err());
    }

    #[test]
    fn blit_empty_source() {
        let source = Image::new_empty_rgba8((0, 0));
        let mut target = Image::new_empty_rgba8((2, 2));

        target.blit(&source, (2, 2)).unwrap();
    }

    #[test]
    fn empty_image_size_limit() {
        assert_eq!(
            ImageFormat::Rgba8.buffer_len((16384, 16384)),
            Some(MAX_IMAGE_BYTES)
        );
        assert!(Image::try_new_empty_rgba8((64, 64)).is_ok());
        assert!(matches!(
            Image::try_new_empty_rgba8((16384, 16385)),
            Err(ImageError::TooLarge { size: (16384, 16385) })
        ));
        assert!(matches!(
            Image::try_new_empty_rgba8((u32::MAX, u32::MAX)),
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn get_pixel() {
        let source = Image::new_empty_rgba8((4, 4));

        assert_eq!(source.get_pixel((0, 0)), Pixel::new(0, 0, 0, 0));
        assert_eq!(source.get_pixel((3, 3)), Pixel::new(0, 0, 0, 0));
    }

    #[test]
    fn set_pixel() {
        let mut source = Image::new_empty_rgba8((3, 3));

        source.set_pixel((0, 0), Pixel::new(1, 2, 3, 4));
        assert_eq!(source.get_pixel((0, 0)), Pixel::new(1, 2, 3, 4));

        source.set_pixel((2, 2), Pixel::new(5, 6, 7, 8));
        assert_eq!(source.get_pixel((2, 2)), Pixel::new(5, 6, 7, 8));

        assert_eq!(&source.data[0..4], &[1, 2, 3, 4]);
        assert_eq!(&source.data[(source.data.len() - 4)..], &[5, 6, 7, 8]);
    }

    #[test]
    fn png_rgba_round_trip() {
        let mut image = Image::new_empty_rgba8((3, 2));
        image.set_pixel((2, 1), Pixel::new(10, 20, 30, 40));

        let mut bytes = Vec::new();
        image.encode_png(&mut bytes).unwrap();

        assert_eq!(Image::decode_png(bytes.as_slice()).unwrap(), image);
    }

    #[test]
    fn png_rgb_gains_opaque_alpha() {
        let bytes = encode_raw_png((2, 1), png::ColorType::Rgb, &[1, 2, 3, 4, 5, 6]);
        let image = Image::decode_png(bytes.as_slice()).unwrap();

        assert_eq!(image.size(), (2, 1));
        assert_eq!(image.get_pixel((0, 0)), Pixel::new(1, 2, 3, 255));
        assert_eq!(image.get_pixel((1, 0)), Pixel::new(4, 5, 6, 255));
    }

    #[test]
    fn png_grayscale_expands() {
        let bytes = encode_raw_png((1, 1), png::ColorType::GrayscaleAlpha, &[77, 128]);
        let image = Image::decode_png(bytes.as_slice()).unwrap();

        assert_eq!(image.get_pixel((0, 0)), Pixel::new(77, 77, 77, 128));
    }

    #[test]
    fn png_garbage() {
        let result = Image::decode_png(&b"definitely not a png"[..]);

        assert!(matches!(result, Err(ImageError::PngDecode { .. })));
    }

    #[test]
    fn gif_partial_frame_keeps_previous() {
        let bytes = encode_gif(
            (4, 4),
            &[
                palette_frame((4, 4), (0, 0), &[0; 16], gif::DisposalMethod::Keep),
                palette_frame((2, 2), (1, 1), &[2, 1, 1, 1], gif::DisposalMethod::Keep),
            ],
        );

        let frames = Image::decode_gif_frames(bytes.as_slice()).unwrap();
        assert_eq!(frames.len(), 2);

        for frame in &frames {
            assert_eq!(frame.size(), (4, 4));
        }

        assert_eq!(frames[0].get_pixel((1, 1)), RED);
        assert_eq!(frames[0].get_pixel((2, 2)), RED);

        // The transparent pixel lets the first frame show through.
        assert_eq!(frames[1].get_pixel((1, 1)), RED);
        assert_eq!(frames[1].get_pixel((2, 1)), BLUE);
        assert_eq!(frames[1].get_pixel((2, 2)), BLUE);
        assert_eq!(frames[1].get_pixel((0, 0)), RED);
        assert_eq!(frames[1].get_pixel((3, 3)), RED);
    }

    #[test]
    fn gif_huge_screen_is_rejected() {
        let bytes = encode_gif(
            (40000, 30000),
            &[palette_frame((1, 1), (0, 0), &[0], gif::DisposalMethod::Keep)],
        );

        let result = Image::decode_gif_frames(bytes.as_slice());

        assert!(matches!(
            result,
            Err(ImageError::TooLarge {
                size: (40000, 30000)
            })
        ));
    }

    #[test]
    fn png_encode_ends_with_iend() {
        let image = Image::new_empty_rgba8((2, 2));

        let mut bytes = Vec::new();
        image.encode_png(&mut bytes).unwrap();

        assert_eq!(&bytes[bytes.len() - 8..bytes.len() - 4], b"IEND");
    }

    #[test]
    fn gif_dispose_background() {
        let bytes = encode_gif(
            (2, 2),
            &[
                palette_frame((2, 2), (0, 0), &[0; 4], gif::DisposalMethod::Background),
                palette_frame((1, 1), (0, 0), &[1], gif::DisposalMethod::Keep),
            ],
        );

        let frames = Image::decode_gif_frames(bytes.as_slice()).unwrap();

        assert_eq!(frames[0].get_pixel((1, 1)), RED);
        assert_eq!(frames[1].get_pixel((0, 0)), BLUE);
        assert_eq!(frames[1].get_pixel((1, 1)), CLEAR);
    }

    #[test]
    fn gif_dispose_previous() {
        let bytes = encode_gif(
            (4, 4),
            &[
                palette_frame((4, 4), (0, 0), &[0; 16], gif::DisposalMethod::Keep),
                palette_frame((2, 2), (0, 0), &[1; 4], gif::DisposalMethod::Previous),
                palette_frame((1, 1), (3, 3), &[1], gif::DisposalMethod::Keep),
            ],
        );

        let frames = Image::decode_gif_frames(bytes.as_slice()).unwrap();
        assert_eq!(frames.len(), 3);

        assert_eq!(frames[1].get_pixel((0, 0)), BLUE);
        assert_eq!(frames[2].get_pixel((0, 0)), RED);
        assert_eq!(frames[2].get_pixel((3, 3)), BLUE);
    }
}
