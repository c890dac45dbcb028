//! AVIF decoding: `avif-parse` for the container, `rav1d` for the AV1 payload.
//!
//! The `image` crate only ships an AVIF encoder without its native feature, so
//! the primary item is decoded here and converted from YUV to RGB8 (BT.601).

use std::ptr::NonNull;

use image::{DynamicImage, RgbImage};
use rav1d::include::dav1d::data::Dav1dData;
use rav1d::include::dav1d::dav1d::Dav1dSettings;
use rav1d::include::dav1d::headers::{
    DAV1D_PIXEL_LAYOUT_I400, DAV1D_PIXEL_LAYOUT_I420, DAV1D_PIXEL_LAYOUT_I422,
    DAV1D_PIXEL_LAYOUT_I444,
};
use rav1d::include::dav1d::picture::Dav1dPicture;
use rav1d::src::lib as dav1d;

use crate::error::ProcessingError;

fn failure(message: impl Into<String>) -> ProcessingError {
    ProcessingError::Processing(message.into())
}

/// Decode the primary image of an AVIF file
pub fn decode_avif(bytes: &[u8]) -> Result<DynamicImage, ProcessingError> {
    let avif = avif_parse::read_avif(&mut std::io::Cursor::new(bytes))
        .map_err(|e| failure(format!("Failed to parse AVIF container: {:?}", e)))?;
    let av1_bytes: &[u8] = &avif.primary_item;

    let mut settings = std::mem::MaybeUninit::<Dav1dSettings>::uninit();
    unsafe { dav1d::dav1d_default_settings(NonNull::from(&mut settings).cast()) };
    let mut settings = unsafe { settings.assume_init() };
    settings.n_threads = 1;
    settings.max_frame_delay = 1;

    let mut ctx = None;
    let rc = unsafe { dav1d::dav1d_open(NonNull::new(&mut ctx), NonNull::new(&mut settings)) };
    if rc.0 != 0 {
        return Err(failure(format!("rav1d open failed ({})", rc.0)));
    }

    // The context is closed exactly once, after every decode path
    let decoded = (|| {
        let mut data = Dav1dData::default();
        let buf_ptr =
            unsafe { dav1d::dav1d_data_create(NonNull::new(&mut data), av1_bytes.len()) };
        if buf_ptr.is_null() {
            return Err(failure("rav1d data_create failed"));
        }
        unsafe { std::ptr::copy_nonoverlapping(av1_bytes.as_ptr(), buf_ptr, av1_bytes.len()) };

        let rc = unsafe { dav1d::dav1d_send_data(ctx, NonNull::new(&mut data)) };
        if rc.0 != 0 {
            unsafe { dav1d::dav1d_data_unref(NonNull::new(&mut data)) };
            return Err(failure(format!("rav1d send_data failed ({})", rc.0)));
        }

        let mut pic: Dav1dPicture = unsafe { std::mem::zeroed() };
        let rc = unsafe { dav1d::dav1d_get_picture(ctx, NonNull::new(&mut pic)) };
        if rc.0 != 0 {
            return Err(failure(format!("rav1d get_picture failed ({})", rc.0)));
        }

        let rgb = picture_to_rgb(&pic);
        unsafe { dav1d::dav1d_picture_unref(NonNull::new(&mut pic)) };
        rgb
    })();

    unsafe { dav1d::dav1d_close(NonNull::new(&mut ctx)) };

    let (width, height, rgb) = decoded?;
    RgbImage::from_raw(width, height, rgb)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| failure("Decoded AVIF planes do not match the frame size"))
}

fn picture_to_rgb(pic: &Dav1dPicture) -> Result<(u32, u32, Vec<u8>), ProcessingError> {
    let width = pic.p.w as u32;
    let height = pic.p.h as u32;
    let plane = |index: usize| {
        pic.data[index]
            .map(|ptr| ptr.as_ptr() as *const u8)
            .ok_or_else(|| failure("rav1d returned a picture without pixel data"))
    };

    let y_ptr = plane(0)?;
    let planes = match pic.p.layout {
        DAV1D_PIXEL_LAYOUT_I400 => YuvPlanes {
            y_ptr,
            u_ptr: y_ptr,
            v_ptr: y_ptr,
            y_stride: pic.stride[0],
            uv_stride: 0,
            width,
            height,
            bpc: pic.p.bpc as u32,
            subsampling: (false, false),
            monochrome: true,
        },
        layout => {
            let subsampling = match layout {
                DAV1D_PIXEL_LAYOUT_I420 => (true, true),
                DAV1D_PIXEL_LAYOUT_I422 => (true, false),
                DAV1D_PIXEL_LAYOUT_I444 => (false, false),
                other => {
                    return Err(failure(format!("Unsupported AVIF pixel layout: {}", other)));
                }
            };
            YuvPlanes {
                y_ptr,
                u_ptr: plane(1)?,
                v_ptr: plane(2)?,
                y_stride: pic.stride[0],
                uv_stride: pic.stride[1],
                width,
                height,
                bpc: pic.p.bpc as u32,
                subsampling,
                monochrome: false,
            }
        }
    };

    Ok((width, height, planes.to_rgb()))
}

/// Borrowed views of the decoded planes; valid until the picture is unreferenced
struct YuvPlanes {
    y_ptr: *const u8,
    u_ptr: *const u8,
    v_ptr: *const u8,
    y_stride: isize,
    uv_stride: isize,
    width: u32,
    height: u32,
    bpc: u32,
    /// (horizontal, vertical) chroma subsampling
    subsampling: (bool, bool),
    monochrome: bool,
}

impl YuvPlanes {
    fn to_rgb(&self) -> Vec<u8> {
        let max_val = ((1u32 << self.bpc) - 1) as f32;
        let center = (1u32 << (self.bpc - 1)) as f32;
        let scale = 255.0 / max_val;
        let (ss_x, ss_y) = self.subsampling;

        let mut rgb = Vec::with_capacity((self.width * self.height * 3) as usize);
        for row in 0..self.height {
            for col in 0..self.width {
                let y = read_sample(self.y_ptr, self.y_stride, col, row, self.bpc);

                let (r, g, b) = if self.monochrome {
                    (y, y, y)
                } else {
                    let u_col = if ss_x { col / 2 } else { col };
                    let u_row = if ss_y { row / 2 } else { row };
                    let cb = read_sample(self.u_ptr, self.uv_stride, u_col, u_row, self.bpc);
                    let cr = read_sample(self.v_ptr, self.uv_stride, u_col, u_row, self.bpc);
                    let (cb, cr) = (cb - center, cr - center);
                    (
                        y + 1.402 * cr,
                        y - 0.344_136 * cb - 0.714_136 * cr,
                        y + 1.772 * cb,
                    )
                };

                for channel in [r, g, b] {
                    rgb.push((channel * scale).clamp(0.0, 255.0) as u8);
                }
            }
        }
        rgb
    }
}

/// One sample from a plane; high bit depths are stored as u16
#[inline]
fn read_sample(ptr: *const u8, stride: isize, x: u32, y: u32, bpc: u32) -> f32 {
    if bpc <= 8 {
        (unsafe { *ptr.offset(y as isize * stride + x as isize) }) as f32
    } else {
        let byte_offset = y as isize * stride + x as isize * 2;
        (unsafe { (ptr.offset(byte_offset) as *const u16).read_unaligned() }) as f32
    }
}
