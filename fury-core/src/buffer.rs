// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt;
use std::ptr;

use byteorder::{ByteOrder, LittleEndian};

use crate::config::Config;
use crate::ensure;
use crate::error::Error;

enum Region<'a> {
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

/// A little-endian random-access byte store with separate reader and writer
/// cursors.
///
/// The buffer either owns its region (created by [`MemoryBuffer::allocate`] or
/// [`MemoryBuffer::from_vec`], grows on demand) or borrows it
/// ([`MemoryBuffer::from_slice`], never grows). Offsets address the full
/// region `[0, capacity)`; the cursor API reads `[reader_index, writer_index)`
/// and appends at `writer_index`. The invariant
/// `reader_index <= writer_index <= capacity` holds at all times.
///
/// Every multi-byte accessor stores little-endian regardless of host order.
/// The `unsafe_*` family skips bounds checks for generated hot loops; all
/// other accessors are checked and return [`enum@Error`] on violation.
pub struct MemoryBuffer<'a> {
    region: Region<'a>,
    reader_index: usize,
    writer_index: usize,
}

impl MemoryBuffer<'static> {
    /// Allocates an owning, zeroed buffer with both cursors at zero.
    pub fn allocate(capacity: usize) -> Result<MemoryBuffer<'static>, Error> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| Error::allocation_failure(format!("allocation of {} bytes rejected", capacity)))?;
        data.resize(capacity, 0);
        Ok(MemoryBuffer {
            region: Region::Owned(data),
            reader_index: 0,
            writer_index: 0,
        })
    }

    /// Allocates an owning buffer sized by [`Config::buffer_initial_capacity`].
    pub fn from_config(config: &Config) -> Result<MemoryBuffer<'static>, Error> {
        Self::allocate(config.buffer_initial_capacity())
    }

    /// Wraps an existing byte vector; the whole vector is readable.
    pub fn from_vec(data: Vec<u8>) -> MemoryBuffer<'static> {
        let writer_index = data.len();
        MemoryBuffer {
            region: Region::Owned(data),
            reader_index: 0,
            writer_index,
        }
    }
}

impl<'a> MemoryBuffer<'a> {
    /// Borrows an existing region; the whole region is readable and the
    /// buffer will never grow.
    pub fn from_slice(data: &'a mut [u8]) -> MemoryBuffer<'a> {
        let writer_index = data.len();
        MemoryBuffer {
            region: Region::Borrowed(data),
            reader_index: 0,
            writer_index,
        }
    }

    #[inline(always)]
    fn data(&self) -> &[u8] {
        match &self.region {
            Region::Owned(data) => data,
            Region::Borrowed(data) => data,
        }
    }

    #[inline(always)]
    fn data_mut(&mut self) -> &mut [u8] {
        match &mut self.region {
            Region::Owned(data) => data,
            Region::Borrowed(data) => data,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data().len()
    }

    /// Number of written bytes, i.e. the writer cursor position.
    pub fn len(&self) -> usize {
        self.writer_index
    }

    pub fn is_empty(&self) -> bool {
        self.writer_index == 0
    }

    pub fn owns_data(&self) -> bool {
        matches!(self.region, Region::Owned(_))
    }

    pub fn reader_index(&self) -> usize {
        self.reader_index
    }

    pub fn writer_index(&self) -> usize {
        self.writer_index
    }

    /// Bytes still readable between the cursors.
    pub fn remaining(&self) -> usize {
        self.writer_index - self.reader_index
    }

    pub fn set_reader_index(&mut self, index: usize) -> Result<(), Error> {
        ensure!(
            index <= self.writer_index,
            Error::programmer_error(format!(
                "reader index {} beyond writer index {}",
                index, self.writer_index
            ))
        );
        self.reader_index = index;
        Ok(())
    }

    pub fn set_writer_index(&mut self, index: usize) -> Result<(), Error> {
        ensure!(
            index >= self.reader_index && index <= self.capacity(),
            Error::programmer_error(format!(
                "writer index {} outside [{}, {}]",
                index,
                self.reader_index,
                self.capacity()
            ))
        );
        self.writer_index = index;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        self.data()
    }

    /// Copies the written region `[0, writer_index)` out of the buffer.
    pub fn dump(&self) -> Vec<u8> {
        self.data()[..self.writer_index].to_vec()
    }

    // Region sizing. Owned buffers grow to the next power of two covering the
    // request; borrowed buffers fail instead.
    fn ensure_put(&mut self, offset: usize, length: usize) -> Result<(), Error> {
        let required = offset + length;
        let capacity = self.capacity();
        if required <= capacity {
            return Ok(());
        }
        match &mut self.region {
            Region::Owned(data) => {
                let target = required.next_power_of_two();
                data.try_reserve_exact(target - data.len())
                    .map_err(|_| Error::allocation_failure(format!("growth to {} bytes rejected", target)))?;
                data.resize(target, 0);
                Ok(())
            }
            Region::Borrowed(_) => Err(Error::buffer_out_of_bound(offset, length, capacity)),
        }
    }

    #[inline(always)]
    fn check_get(&self, offset: usize, length: usize) -> Result<(), Error> {
        ensure!(
            offset + length <= self.capacity(),
            Error::buffer_out_of_bound(offset, length, self.capacity())
        );
        Ok(())
    }

    #[inline(always)]
    fn check_read(&self, length: usize) -> Result<(), Error> {
        ensure!(
            self.reader_index + length <= self.writer_index,
            Error::buffer_out_of_bound(self.reader_index, length, self.writer_index)
        );
        Ok(())
    }

    pub fn put_u8(&mut self, offset: usize, value: u8) -> Result<(), Error> {
        self.ensure_put(offset, 1)?;
        self.data_mut()[offset] = value;
        Ok(())
    }

    pub fn put_i8(&mut self, offset: usize, value: i8) -> Result<(), Error> {
        self.put_u8(offset, value as u8)
    }

    pub fn put_u16(&mut self, offset: usize, value: u16) -> Result<(), Error> {
        self.ensure_put(offset, 2)?;
        LittleEndian::write_u16(&mut self.data_mut()[offset..offset + 2], value);
        Ok(())
    }

    pub fn put_i16(&mut self, offset: usize, value: i16) -> Result<(), Error> {
        self.ensure_put(offset, 2)?;
        LittleEndian::write_i16(&mut self.data_mut()[offset..offset + 2], value);
        Ok(())
    }

    pub fn put_u32(&mut self, offset: usize, value: u32) -> Result<(), Error> {
        self.ensure_put(offset, 4)?;
        LittleEndian::write_u32(&mut self.data_mut()[offset..offset + 4], value);
        Ok(())
    }

    pub fn put_i32(&mut self, offset: usize, value: i32) -> Result<(), Error> {
        self.ensure_put(offset, 4)?;
        LittleEndian::write_i32(&mut self.data_mut()[offset..offset + 4], value);
        Ok(())
    }

    pub fn put_u64(&mut self, offset: usize, value: u64) -> Result<(), Error> {
        self.ensure_put(offset, 8)?;
        LittleEndian::write_u64(&mut self.data_mut()[offset..offset + 8], value);
        Ok(())
    }

    pub fn put_i64(&mut self, offset: usize, value: i64) -> Result<(), Error> {
        self.ensure_put(offset, 8)?;
        LittleEndian::write_i64(&mut self.data_mut()[offset..offset + 8], value);
        Ok(())
    }

    pub fn put_f32(&mut self, offset: usize, value: f32) -> Result<(), Error> {
        self.ensure_put(offset, 4)?;
        LittleEndian::write_f32(&mut self.data_mut()[offset..offset + 4], value);
        Ok(())
    }

    pub fn put_f64(&mut self, offset: usize, value: f64) -> Result<(), Error> {
        self.ensure_put(offset, 8)?;
        LittleEndian::write_f64(&mut self.data_mut()[offset..offset + 8], value);
        Ok(())
    }

    pub fn put_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<(), Error> {
        self.ensure_put(offset, bytes.len())?;
        self.data_mut()[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn get_u8(&self, offset: usize) -> Result<u8, Error> {
        self.check_get(offset, 1)?;
        Ok(self.data()[offset])
    }

    pub fn get_i8(&self, offset: usize) -> Result<i8, Error> {
        Ok(self.get_u8(offset)? as i8)
    }

    pub fn get_u16(&self, offset: usize) -> Result<u16, Error> {
        self.check_get(offset, 2)?;
        Ok(LittleEndian::read_u16(&self.data()[offset..]))
    }

    pub fn get_i16(&self, offset: usize) -> Result<i16, Error> {
        self.check_get(offset, 2)?;
        Ok(LittleEndian::read_i16(&self.data()[offset..]))
    }

    pub fn get_u32(&self, offset: usize) -> Result<u32, Error> {
        self.check_get(offset, 4)?;
        Ok(LittleEndian::read_u32(&self.data()[offset..]))
    }

    pub fn get_i32(&self, offset: usize) -> Result<i32, Error> {
        self.check_get(offset, 4)?;
        Ok(LittleEndian::read_i32(&self.data()[offset..]))
    }

    pub fn get_u64(&self, offset: usize) -> Result<u64, Error> {
        self.check_get(offset, 8)?;
        Ok(LittleEndian::read_u64(&self.data()[offset..]))
    }

    pub fn get_i64(&self, offset: usize) -> Result<i64, Error> {
        self.check_get(offset, 8)?;
        Ok(LittleEndian::read_i64(&self.data()[offset..]))
    }

    pub fn get_f32(&self, offset: usize) -> Result<f32, Error> {
        self.check_get(offset, 4)?;
        Ok(LittleEndian::read_f32(&self.data()[offset..]))
    }

    pub fn get_f64(&self, offset: usize) -> Result<f64, Error> {
        self.check_get(offset, 8)?;
        Ok(LittleEndian::read_f64(&self.data()[offset..]))
    }

    pub fn get_bytes(&self, offset: usize, length: usize) -> Result<&[u8], Error> {
        self.check_get(offset, length)?;
        Ok(&self.data()[offset..offset + length])
    }

    #[inline(always)]
    unsafe fn raw_put(&mut self, offset: usize, bytes: &[u8]) {
        ptr::copy_nonoverlapping(
            bytes.as_ptr(),
            self.data_mut().as_mut_ptr().add(offset),
            bytes.len(),
        );
    }

    #[inline(always)]
    unsafe fn raw_get<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut bytes = [0u8; N];
        ptr::copy_nonoverlapping(self.data().as_ptr().add(offset), bytes.as_mut_ptr(), N);
        bytes
    }

    /// # Safety
    /// `offset + 1 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_u8(&mut self, offset: usize, value: u8) {
        self.raw_put(offset, &[value]);
    }

    /// # Safety
    /// `offset + 1 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_i8(&mut self, offset: usize, value: i8) {
        self.unsafe_put_u8(offset, value as u8);
    }

    /// # Safety
    /// `offset + 2 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_u16(&mut self, offset: usize, value: u16) {
        self.raw_put(offset, &value.to_le_bytes());
    }

    /// # Safety
    /// `offset + 2 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_i16(&mut self, offset: usize, value: i16) {
        self.raw_put(offset, &value.to_le_bytes());
    }

    /// # Safety
    /// `offset + 4 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_u32(&mut self, offset: usize, value: u32) {
        self.raw_put(offset, &value.to_le_bytes());
    }

    /// # Safety
    /// `offset + 4 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_i32(&mut self, offset: usize, value: i32) {
        self.raw_put(offset, &value.to_le_bytes());
    }

    /// # Safety
    /// `offset + 8 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_u64(&mut self, offset: usize, value: u64) {
        self.raw_put(offset, &value.to_le_bytes());
    }

    /// # Safety
    /// `offset + 8 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_i64(&mut self, offset: usize, value: i64) {
        self.raw_put(offset, &value.to_le_bytes());
    }

    /// # Safety
    /// `offset + 4 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_f32(&mut self, offset: usize, value: f32) {
        self.raw_put(offset, &value.to_le_bytes());
    }

    /// # Safety
    /// `offset + 8 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_put_f64(&mut self, offset: usize, value: f64) {
        self.raw_put(offset, &value.to_le_bytes());
    }

    /// # Safety
    /// `offset + 1 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_u8(&self, offset: usize) -> u8 {
        self.raw_get::<1>(offset)[0]
    }

    /// # Safety
    /// `offset + 1 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_i8(&self, offset: usize) -> i8 {
        self.unsafe_get_u8(offset) as i8
    }

    /// # Safety
    /// `offset + 2 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_u16(&self, offset: usize) -> u16 {
        u16::from_le_bytes(self.raw_get(offset))
    }

    /// # Safety
    /// `offset + 2 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_i16(&self, offset: usize) -> i16 {
        i16::from_le_bytes(self.raw_get(offset))
    }

    /// # Safety
    /// `offset + 4 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_u32(&self, offset: usize) -> u32 {
        u32::from_le_bytes(self.raw_get(offset))
    }

    /// # Safety
    /// `offset + 4 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_i32(&self, offset: usize) -> i32 {
        i32::from_le_bytes(self.raw_get(offset))
    }

    /// # Safety
    /// `offset + 8 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_u64(&self, offset: usize) -> u64 {
        u64::from_le_bytes(self.raw_get(offset))
    }

    /// # Safety
    /// `offset + 8 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_i64(&self, offset: usize) -> i64 {
        i64::from_le_bytes(self.raw_get(offset))
    }

    /// # Safety
    /// `offset + 4 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_f32(&self, offset: usize) -> f32 {
        f32::from_le_bytes(self.raw_get(offset))
    }

    /// # Safety
    /// `offset + 8 <= capacity` must hold.
    #[inline(always)]
    pub unsafe fn unsafe_get_f64(&self, offset: usize) -> f64 {
        f64::from_le_bytes(self.raw_get(offset))
    }

    fn encode_varuint32(value: u32, out: &mut [u8; 5]) -> usize {
        if value < 0x80 {
            out[0] = value as u8;
            1
        } else if value < 0x4000 {
            out[0] = ((value & 0x7F) as u8) | 0x80;
            out[1] = (value >> 7) as u8;
            2
        } else if value < 0x20_0000 {
            out[0] = ((value & 0x7F) as u8) | 0x80;
            out[1] = (((value >> 7) & 0x7F) as u8) | 0x80;
            out[2] = (value >> 14) as u8;
            3
        } else if value < 0x1000_0000 {
            out[0] = ((value & 0x7F) as u8) | 0x80;
            out[1] = (((value >> 7) & 0x7F) as u8) | 0x80;
            out[2] = (((value >> 14) & 0x7F) as u8) | 0x80;
            out[3] = (value >> 21) as u8;
            4
        } else {
            out[0] = ((value & 0x7F) as u8) | 0x80;
            out[1] = (((value >> 7) & 0x7F) as u8) | 0x80;
            out[2] = (((value >> 14) & 0x7F) as u8) | 0x80;
            out[3] = (((value >> 21) & 0x7F) as u8) | 0x80;
            out[4] = (value >> 28) as u8;
            5
        }
    }

    fn encode_varuint64(mut value: u64, out: &mut [u8; 9]) -> usize {
        let mut index = 0;
        while index < 8 {
            if value < 0x80 {
                out[index] = value as u8;
                return index + 1;
            }
            out[index] = ((value & 0x7F) as u8) | 0x80;
            value >>= 7;
            index += 1;
        }
        // ninth byte carries the remaining 8 bits verbatim
        out[8] = value as u8;
        9
    }

    fn decode_varuint32(&self, offset: usize, limit: usize) -> Result<(u32, usize), Error> {
        let data = self.data();
        let mut value = 0u32;
        for index in 0..5 {
            let position = offset + index;
            ensure!(
                position < limit,
                Error::varint_malformed(format!(
                    "varint32 at offset {} truncated after {} bytes",
                    offset, index
                ))
            );
            let byte = data[position];
            value |= ((byte & 0x7F) as u32) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok((value, index + 1));
            }
        }
        Err(Error::varint_malformed(format!(
            "varint32 at offset {} has no terminator within 5 bytes",
            offset
        )))
    }

    fn decode_varuint64(&self, offset: usize, limit: usize) -> Result<(u64, usize), Error> {
        let data = self.data();
        let mut value = 0u64;
        for index in 0..8 {
            let position = offset + index;
            ensure!(
                position < limit,
                Error::varint_malformed(format!(
                    "varint64 at offset {} truncated after {} bytes",
                    offset, index
                ))
            );
            let byte = data[position];
            value |= ((byte & 0x7F) as u64) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok((value, index + 1));
            }
        }
        let position = offset + 8;
        ensure!(
            position < limit,
            Error::varint_malformed(format!(
                "varint64 at offset {} truncated after 8 bytes",
                offset
            ))
        );
        value |= (data[position] as u64) << 56;
        Ok((value, 9))
    }

    /// Writes `value` as a 1-5 byte positive varint at `offset` and returns
    /// the number of bytes written.
    pub fn put_varuint32(&mut self, offset: usize, value: u32) -> Result<usize, Error> {
        let mut encoded = [0u8; 5];
        let length = Self::encode_varuint32(value, &mut encoded);
        self.put_bytes(offset, &encoded[..length])?;
        Ok(length)
    }

    /// Reads a positive varint at `offset` and returns `(value, bytes_read)`.
    pub fn get_varuint32(&self, offset: usize) -> Result<(u32, usize), Error> {
        self.decode_varuint32(offset, self.capacity())
    }

    /// Writes `value` as a 1-9 byte positive varint at `offset` and returns
    /// the number of bytes written.
    pub fn put_varuint64(&mut self, offset: usize, value: u64) -> Result<usize, Error> {
        let mut encoded = [0u8; 9];
        let length = Self::encode_varuint64(value, &mut encoded);
        self.put_bytes(offset, &encoded[..length])?;
        Ok(length)
    }

    /// Reads a positive varint at `offset` and returns `(value, bytes_read)`.
    pub fn get_varuint64(&self, offset: usize) -> Result<(u64, usize), Error> {
        self.decode_varuint64(offset, self.capacity())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.put_u8(self.writer_index, value)?;
        self.writer_index += 1;
        Ok(())
    }

    pub fn write_i8(&mut self, value: i8) -> Result<(), Error> {
        self.write_u8(value as u8)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), Error> {
        self.put_u16(self.writer_index, value)?;
        self.writer_index += 2;
        Ok(())
    }

    pub fn write_i16(&mut self, value: i16) -> Result<(), Error> {
        self.put_i16(self.writer_index, value)?;
        self.writer_index += 2;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), Error> {
        self.put_u32(self.writer_index, value)?;
        self.writer_index += 4;
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), Error> {
        self.put_i32(self.writer_index, value)?;
        self.writer_index += 4;
        Ok(())
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), Error> {
        self.put_u64(self.writer_index, value)?;
        self.writer_index += 8;
        Ok(())
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), Error> {
        self.put_i64(self.writer_index, value)?;
        self.writer_index += 8;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), Error> {
        self.put_f32(self.writer_index, value)?;
        self.writer_index += 4;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), Error> {
        self.put_f64(self.writer_index, value)?;
        self.writer_index += 8;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.put_bytes(self.writer_index, bytes)?;
        self.writer_index += bytes.len();
        Ok(())
    }

    pub fn write_varuint32(&mut self, value: u32) -> Result<usize, Error> {
        let length = self.put_varuint32(self.writer_index, value)?;
        self.writer_index += length;
        Ok(length)
    }

    pub fn write_varuint64(&mut self, value: u64) -> Result<usize, Error> {
        let length = self.put_varuint64(self.writer_index, value)?;
        self.writer_index += length;
        Ok(length)
    }

    /// Zigzag-encodes a signed value into the positive varint codec.
    pub fn write_varint32(&mut self, value: i32) -> Result<usize, Error> {
        let zigzag = ((value as i64) << 1) ^ ((value as i64) >> 31);
        self.write_varuint32(zigzag as u32)
    }

    pub fn write_varint64(&mut self, value: i64) -> Result<usize, Error> {
        let zigzag = ((value << 1) ^ (value >> 63)) as u64;
        self.write_varuint64(zigzag)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.check_read(1)?;
        let value = self.data()[self.reader_index];
        self.reader_index += 1;
        Ok(value)
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        self.check_read(2)?;
        let value = LittleEndian::read_u16(&self.data()[self.reader_index..]);
        self.reader_index += 2;
        Ok(value)
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        self.check_read(2)?;
        let value = LittleEndian::read_i16(&self.data()[self.reader_index..]);
        self.reader_index += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        self.check_read(4)?;
        let value = LittleEndian::read_u32(&self.data()[self.reader_index..]);
        self.reader_index += 4;
        Ok(value)
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        self.check_read(4)?;
        let value = LittleEndian::read_i32(&self.data()[self.reader_index..]);
        self.reader_index += 4;
        Ok(value)
    }

    pub fn read_u64(&mut self) -> Result<u64, Error> {
        self.check_read(8)?;
        let value = LittleEndian::read_u64(&self.data()[self.reader_index..]);
        self.reader_index += 8;
        Ok(value)
    }

    pub fn read_i64(&mut self) -> Result<i64, Error> {
        self.check_read(8)?;
        let value = LittleEndian::read_i64(&self.data()[self.reader_index..]);
        self.reader_index += 8;
        Ok(value)
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        self.check_read(4)?;
        let value = LittleEndian::read_f32(&self.data()[self.reader_index..]);
        self.reader_index += 4;
        Ok(value)
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        self.check_read(8)?;
        let value = LittleEndian::read_f64(&self.data()[self.reader_index..]);
        self.reader_index += 8;
        Ok(value)
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<&[u8], Error> {
        self.check_read(length)?;
        let start = self.reader_index;
        self.reader_index += length;
        Ok(&self.data()[start..start + length])
    }

    pub fn read_varuint32(&mut self) -> Result<u32, Error> {
        let (value, length) = self.decode_varuint32(self.reader_index, self.writer_index)?;
        self.reader_index += length;
        Ok(value)
    }

    pub fn read_varuint64(&mut self) -> Result<u64, Error> {
        let (value, length) = self.decode_varuint64(self.reader_index, self.writer_index)?;
        self.reader_index += length;
        Ok(value)
    }

    pub fn read_varint32(&mut self) -> Result<i32, Error> {
        let encoded = self.read_varuint32()?;
        Ok(((encoded >> 1) as i32) ^ -((encoded & 1) as i32))
    }

    pub fn read_varint64(&mut self) -> Result<i64, Error> {
        let encoded = self.read_varuint64()?;
        Ok(((encoded >> 1) as i64) ^ -((encoded & 1) as i64))
    }

    pub fn skip(&mut self, length: usize) -> Result<(), Error> {
        self.check_read(length)?;
        self.reader_index += length;
        Ok(())
    }
}

impl fmt::Display for MemoryBuffer<'_> {
    /// Lossy UTF-8 view of the whole region `[0, capacity)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.data()))
    }
}
