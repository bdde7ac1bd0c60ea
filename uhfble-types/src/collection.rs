//! Scan-session tag collection
//!
//! Owned by the application, not by the reader session. Repeat
//! observations of one EPC fold into a single entry.

use std::collections::HashMap;
use std::io::Write;

use chrono::SecondsFormat;

use crate::error::Result;
use crate::tag::TagReading;

/// Deduplicated tags in first-seen order
#[derive(Debug, Clone, Default)]
pub struct TagCollection {
    tags: Vec<TagReading>,
    index: HashMap<String, usize>,
}

impl TagCollection {
    /// CSV header written by [`TagCollection::write_csv`]
    pub const CSV_HEADER: [&'static str; 5] = ["EPC", "PC", "RSSI", "Count", "LastSeen"];
    
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Record an observation
    ///
    /// A new EPC is inserted as is. A known EPC has its count increased
    /// by the incoming count, and takes the incoming timestamp, RSSI and
    /// PC word.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use uhfble_types::{TagCollection, TagReading};
    ///
    /// let mut tags = TagCollection::new();
    /// tags.record(TagReading::new("E2001234", "2000", 0x40, Utc::now()));
    /// let merged = tags.record(TagReading::new("E2001234", "2000", 0x42, Utc::now()));
    ///
    /// assert_eq!(merged.count, 2);
    /// assert_eq!(tags.len(), 1);
    /// ```
    pub fn record(&mut self, reading: TagReading) -> &TagReading {
        match self.index.get(&reading.epc) {
            Some(&pos) => {
                let entry = &mut self.tags[pos];
                entry.count = entry.count.saturating_add(reading.count);
                entry.timestamp = reading.timestamp;
                entry.rssi = reading.rssi;
                entry.pc = reading.pc;
                &self.tags[pos]
            }
            None => {
                let pos = self.tags.len();
                self.index.insert(reading.epc.clone(), pos);
                self.tags.push(reading);
                &self.tags[pos]
            }
        }
    }
    
    /// Look up a tag by EPC
    pub fn get(&self, epc: &str) -> Option<&TagReading> {
        self.index.get(epc).map(|&pos| &self.tags[pos])
    }
    
    /// Number of distinct tags
    pub fn len(&self) -> usize {
        self.tags.len()
    }
    
    /// Check if no tag has been recorded
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
    
    /// Sum of all observation counts
    pub fn total_reads(&self) -> u64 {
        self.tags.iter().map(|t| u64::from(t.count)).sum()
    }
    
    /// Iterate in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &TagReading> {
        self.tags.iter()
    }
    
    /// Forget all tags (start a new scan session)
    pub fn clear(&mut self) {
        self.tags.clear();
        self.index.clear();
    }
    
    /// Export as CSV, one row per distinct tag
    ///
    /// # Errors
    ///
    /// Returns [`Error::Csv`](crate::Error::Csv) if the writer fails.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(Self::CSV_HEADER)?;
        
        for tag in &self.tags {
            writer.write_record([
                tag.epc.clone(),
                tag.pc.clone(),
                tag.rssi.to_string(),
                tag.count.to_string(),
                tag.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            ])?;
        }
        
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TagCollection {
    type Item = &'a TagReading;
    type IntoIter = std::slice::Iter<'a, TagReading>;
    
    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    
    #[test]
    fn test_repeat_epc_merges() {
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let second = first + Duration::seconds(3);
        
        let mut tags = TagCollection::new();
        tags.record(TagReading::new("E28011700000020A", "3000", 0x50, first));
        tags.record(TagReading::new("E28011700000020A", "3000", 0x52, second));
        
        assert_eq!(tags.len(), 1);
        
        let tag = tags.get("E28011700000020A").unwrap();
        assert_eq!(tag.count, 2);
        assert_eq!(tag.timestamp, second);
        assert_eq!(tag.rssi, 0x52);
    }
    
    #[test]
    fn test_distinct_epcs_keep_order() {
        let now = Utc::now();
        let mut tags = TagCollection::new();
        tags.record(TagReading::new("BB", "0800", 1, now));
        tags.record(TagReading::new("AA", "0800", 1, now));
        tags.record(TagReading::new("BB", "0800", 1, now));
        
        let order: Vec<&str> = tags.iter().map(|t| t.epc.as_str()).collect();
        assert_eq!(order, vec!["BB", "AA"]);
        assert_eq!(tags.total_reads(), 3);
    }
    
    #[test]
    fn test_clear() {
        let mut tags = TagCollection::new();
        tags.record(TagReading::new("AA", "0800", 1, Utc::now()));
        tags.clear();
        
        assert!(tags.is_empty());
        assert!(tags.get("AA").is_none());
    }
    
    #[test]
    fn test_write_csv() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut tags = TagCollection::new();
        tags.record(TagReading::new("E200ABCD", "1000", 200, at));
        
        let mut out = Vec::new();
        tags.write_csv(&mut out).unwrap();
        
        let csv = String::from_utf8(out).unwrap();
        assert_eq!(
            csv,
            "EPC,PC,RSSI,Count,LastSeen\nE200ABCD,1000,200,1,2024-05-01T12:00:00.000Z\n"
        );
    }
    
    #[test]
    fn test_write_csv_empty() {
        let mut out = Vec::new();
        TagCollection::new().write_csv(&mut out).unwrap();
        
        assert_eq!(String::from_utf8(out).unwrap(), "EPC,PC,RSSI,Count,LastSeen\n");
    }
    
    #[test]
    fn test_write_csv_rows_in_first_seen_order() {
        let first = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let later = first + Duration::milliseconds(1500);
        
        let mut tags = TagCollection::new();
        tags.record(TagReading::new("BB01", "0800", 0x40, first));
        tags.record(TagReading::new("AA02", "0800", 0x41, first));
        tags.record(TagReading::new("BB01", "0800", 0x42, later));
        
        let mut out = Vec::new();
        tags.write_csv(&mut out).unwrap();
        
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "EPC,PC,RSSI,Count,LastSeen\n\
             BB01,0800,66,2,2024-05-01T12:00:01.500Z\n\
             AA02,0800,65,1,2024-05-01T12:00:00.000Z\n"
        );
    }
}
