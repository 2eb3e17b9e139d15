//! Platform binding: reads the buffer layout from firmware properties.

use crate::coproc::{
    Coprocessor, CoprocessorBuilder, DEVICE_NAME, DriverError, Result, poll::PollBudget,
    window::RegisterWindow,
};

/// Compatible string of the device-tree node this driver binds to.
pub const COMPATIBLE: &str = "kik,axi_coprocessor_interface";

pub const INPUT_BUFFER_OFFSET_PROP: &str = "kik,input_buffer_offset";
pub const OUTPUT_BUFFER_OFFSET_PROP: &str = "kik,output_buffer_offset";

/// Named integer properties of the matched platform node.
pub trait PlatformProperties {
    fn read_u32(&self, name: &str) -> Option<u32>;
}

impl PlatformProperties for [(&str, u32)] {
    fn read_u32(&self, name: &str) -> Option<u32> {
        self.iter().find(|(key, _)| *key == name).map(|&(_, v)| v)
    }
}

impl<const K: usize> PlatformProperties for [(&str, u32); K] {
    fn read_u32(&self, name: &str) -> Option<u32> {
        self.as_slice().read_u32(name)
    }
}

impl<P: PlatformProperties + ?Sized> PlatformProperties for &P {
    fn read_u32(&self, name: &str) -> Option<u32> {
        (**self).read_u32(name)
    }
}

/// Brings up a device over an already mapped `window`.
///
/// # Errors
/// `DeviceNotReady` if either buffer offset property is missing or the resulting
/// layout is rejected by [`CoprocessorBuilder::build`].
pub fn probe<W, const N: usize>(
    window: W,
    props: &(impl PlatformProperties + ?Sized),
    poll: PollBudget,
) -> Result<Coprocessor<W, N>>
where
    W: RegisterWindow,
{
    let buf_in = read_offset(props, INPUT_BUFFER_OFFSET_PROP)?;
    let buf_out = read_offset(props, OUTPUT_BUFFER_OFFSET_PROP)?;

    CoprocessorBuilder::new()
        .window(window)
        .max_transfer::<N>()
        .buffers(buf_in, buf_out)
        .poll_budget(poll)
        .build()
}

fn read_offset(props: &(impl PlatformProperties + ?Sized), name: &str) -> Result<usize> {
    match props.read_u32(name) {
        Some(v) => Ok(v as usize),
        None => {
            log::error!("{DEVICE_NAME}: could not read {name} property");
            Err(DriverError::DeviceNotReady)
        }
    }
}
