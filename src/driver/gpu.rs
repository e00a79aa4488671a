use crate::gui::{Color, Opa, OPA_COVER, OPA_TRANSP};

use super::GpuDriver;

/// A [GpuDriver] with no hardware behind it: plain per-element loops.
#[derive(Debug, Default)]
pub struct SoftwareGpu {}

impl GpuDriver for SoftwareGpu {
    fn mem_blend(&mut self, dest: &mut [Color], src: &[Color], opa: Opa) {
        match opa {
            OPA_TRANSP => {}
            OPA_COVER => {
                let len = dest.len().min(src.len());
                dest[..len].copy_from_slice(&src[..len]);
            }
            _ => {
                for (d, s) in dest.iter_mut().zip(src) {
                    *d = Color::mix(*s, *d, opa);
                }
            }
        }
    }

    fn mem_fill(&mut self, dest: &mut [Color], color: Color) {
        dest.fill(color);
    }
}
