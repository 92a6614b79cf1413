mod common;

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cfgdata_application::configs::{register_catalog, AvatarData, LanguageData};
use cfgdata_application::{ConfigTable, LoaderConfig, TableRegistry};
use cfgdata_infrastructure::{AsyncByteSource, SourceError, TokioFileSource};
use cfgdata_storage::encode_records;

use common::{TempDir, TestResult};

/// 内存中的异步来源，记录 fetch 次数
#[derive(Default)]
struct MemorySource {
  files: HashMap<String, Vec<u8>>,
  fetches: AtomicUsize,
}

impl MemorySource {
  fn with(mut self, location: &str, bytes: Vec<u8>) -> Self {
    self.files.insert(location.to_string(), bytes);
    self
  }
}

impl AsyncByteSource for MemorySource {
  fn fetch(&self, location: &str) -> impl Future<Output = cfgdata_infrastructure::Result<Vec<u8>>> + Send {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    let found = self
      .files
      .get(location)
      .cloned()
      .ok_or_else(|| SourceError::NotFound { location: location.to_string() });
    async move {
      tokio::task::yield_now().await;
      found
    }
  }
}

fn avatar_bytes() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
  let records = vec![
    AvatarData { id: 1, asset: "fox.png".to_string() },
    AvatarData { id: 2, asset: "owl.png".to_string() },
  ];
  Ok(encode_records(&records)?)
}

#[tokio::test]
async fn initialize_async_from_tokio_files() -> TestResult {
  let dir = TempDir::new("cfgdata_async")?;
  dir.write("Avatar.data", &avatar_bytes()?)?;

  let source = TokioFileSource::new(dir.path());
  let table = ConfigTable::<AvatarData>::new();
  table.initialize_async(&source, "Avatar.data").await?;

  assert_eq!(table.count(), 2);
  assert_eq!(table.get_by_id(2)?.map(|a| a.asset.clone()), Some("owl.png".to_string()));

  let err = ConfigTable::<AvatarData>::new()
    .initialize_async(&source, "Nope.data")
    .await
    .unwrap_err();
  assert!(err.is_file_not_found());
  Ok(())
}

#[tokio::test]
async fn initialize_async_is_noop_once_loaded() -> TestResult {
  let source = MemorySource::default().with("Avatar.data", avatar_bytes()?);
  let table = ConfigTable::<AvatarData>::new();

  table.initialize_async(&source, "Avatar.data").await?;
  table.initialize_async(&source, "Avatar.data").await?;

  assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
  Ok(())
}

#[tokio::test]
async fn reload_async_failure_keeps_snapshot() -> TestResult {
  let source = MemorySource::default()
    .with("Avatar.data", avatar_bytes()?)
    .with("Broken.data", vec![1, 2, 3, 4, 5, 6, 7]);
  let table = ConfigTable::<AvatarData>::new();
  table.initialize_async(&source, "Avatar.data").await?;

  assert!(table.reload_async(&source, "Broken.data").await.unwrap_err().is_corrupt_data());
  assert!(table.reload_async(&source, "Gone.data").await.unwrap_err().is_file_not_found());
  assert_eq!(table.count(), 2);
  Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tables_load_concurrently_across_tasks() -> TestResult {
  let source = Arc::new(MemorySource::default().with("Avatar.data", avatar_bytes()?));
  let table = Arc::new(ConfigTable::<AvatarData>::new());

  let tasks: Vec<_> = (0..4)
    .map(|_| {
      let source = Arc::clone(&source);
      let table = Arc::clone(&table);
      tokio::spawn(async move { table.initialize_async(source.as_ref(), "Avatar.data").await.is_ok() })
    })
    .collect();

  for task in tasks {
    assert!(task.await?);
  }
  assert_eq!(table.count(), 2);
  Ok(())
}

#[tokio::test]
async fn registry_initialize_all_async() -> TestResult {
  let source = MemorySource::default().with("Avatar.data", avatar_bytes()?);

  let mut registry = TableRegistry::new(LoaderConfig::default());
  register_catalog(&mut registry);

  let report = registry.initialize_all_async(&source).await?;
  assert_eq!(report.loaded, vec!["Avatar"]);
  assert_eq!(report.failed.len(), 4);
  assert!(report.failed.iter().all(|e| e.is_file_not_found()));

  let language = registry.table::<LanguageData>().ok_or("language not registered")?;
  assert!(language.get_by_lang_code("en").unwrap_err().is_not_initialized());
  Ok(())
}
