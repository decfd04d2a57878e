//! IO helper: buffered JSON file read

use std::{fs::File, io::BufReader, path::Path};

use serde_json::Value;

use crate::model::data_core::AppError;

/// 从文件读取并解析JSON文档
pub fn read_json_file(p: &Path) -> Result<Value, AppError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    let v: Value = serde_json::from_reader(rdr)?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_json_file() {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(br#"{"a": [1, 2], "b": null}"#)
            .expect("写入临时文件失败");

        let v = read_json_file(file.path()).expect("读取JSON文件应该成功");
        assert_eq!(v["a"][1], 2);
        assert!(v["b"].is_null());
    }

    #[test]
    fn test_read_invalid_json_file() {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(b"{ not json }").expect("写入临时文件失败");

        assert!(read_json_file(file.path()).is_err(), "非法JSON应该返回错误");
    }
}
