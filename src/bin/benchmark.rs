//! Performance benchmarks for SyncVault stores
//!
//! Measures latency and throughput of in-process operations for each
//! marshal format, single-task and under concurrent writers.

use std::sync::Arc;
use std::time::{Duration, Instant};
use syncvault::{MarshalFormat, MemoryStore, Store, StoreConfig};
use tokio::sync::Semaphore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Writer tasks allowed to run against the store at the same time
const MAX_IN_FLIGHT_TASKS: usize = 8;

fn in_flight_limit(num_tasks: usize) -> usize {
    MAX_IN_FLIGHT_TASKS.min(num_tasks).max(1)
}

#[derive(Debug)]
struct BenchmarkResults {
    operation: String,
    total_operations: usize,
    duration: Duration,
    ops_per_second: f64,
    avg_latency_us: f64,
    p95_latency_us: f64,
    p99_latency_us: f64,
}

impl BenchmarkResults {
    fn new(operation: String, total_operations: usize, duration: Duration, latencies: &mut [Duration]) -> Self {
        latencies.sort();

        let ops_per_second = total_operations as f64 / duration.as_secs_f64();
        let avg_latency_us = if latencies.is_empty() {
            0.0
        } else {
            latencies.iter().map(|d| d.as_secs_f64() * 1_000_000.0).sum::<f64>() / latencies.len() as f64
        };

        let p95_index = (latencies.len() as f64 * 0.95) as usize;
        let p99_index = (latencies.len() as f64 * 0.99) as usize;

        let p95_latency_us = latencies.get(p95_index).unwrap_or(&Duration::ZERO).as_secs_f64() * 1_000_000.0;
        let p99_latency_us = latencies.get(p99_index).unwrap_or(&Duration::ZERO).as_secs_f64() * 1_000_000.0;

        Self {
            operation,
            total_operations,
            duration,
            ops_per_second,
            avg_latency_us,
            p95_latency_us,
            p99_latency_us,
        }
    }

    fn print(&self) {
        println!("=== {} Benchmark Results ===", self.operation);
        println!("Total operations: {}", self.total_operations);
        println!("Duration: {:.3}s", self.duration.as_secs_f64());
        println!("Throughput: {:.2} ops/sec", self.ops_per_second);
        println!("Average latency: {:.2}us", self.avg_latency_us);
        println!("P95 latency: {:.2}us", self.p95_latency_us);
        println!("P99 latency: {:.2}us", self.p99_latency_us);
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("SyncVault Performance Benchmarks");
    println!("================================");
    println!();

    for format in [MarshalFormat::Json, MarshalFormat::Bincode] {
        info!(%format, "running benchmarks");
        let store = Arc::new(MemoryStore::new(
            StoreConfig::default().with_marshal_format(format.clone()),
        ));

        run_single_task_benchmarks(&store, &format)?;
        run_concurrent_benchmarks(&store, &format).await?;
        store.close()?;
    }

    Ok(())
}

fn run_single_task_benchmarks(store: &MemoryStore, format: &MarshalFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("Running single task benchmarks ({})...", format);

    benchmark_set_operations(store, format, 10000)?.print();
    benchmark_get_operations(store, format, 10000)?.print();
    benchmark_mixed_workload(store, format, 10000)?.print();

    store.clear();
    Ok(())
}

async fn run_concurrent_benchmarks(store: &Arc<MemoryStore>, format: &MarshalFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "Running concurrent writer benchmarks ({}, at most {} tasks in flight)...",
        format, MAX_IN_FLIGHT_TASKS
    );

    for num_tasks in [10, 50, 100] {
        let results = benchmark_concurrent_operations(store, format, num_tasks, 1000).await?;
        results.print();
        store.clear();
    }

    Ok(())
}

fn benchmark_set_operations(store: &MemoryStore, format: &MarshalFormat, num_operations: usize) -> Result<BenchmarkResults, Box<dyn std::error::Error>> {
    let mut latencies = Vec::with_capacity(num_operations);

    let start = Instant::now();

    for i in 0..num_operations {
        let key = format!("bench_key_{}", i);
        let value = format!("bench_value_{}", i);

        let op_start = Instant::now();
        store.set(&key, &value)?;
        latencies.push(op_start.elapsed());
    }

    let total_duration = start.elapsed();

    Ok(BenchmarkResults::new(
        format!("SET [{}]", format),
        num_operations,
        total_duration,
        &mut latencies,
    ))
}

fn benchmark_get_operations(store: &MemoryStore, format: &MarshalFormat, num_operations: usize) -> Result<BenchmarkResults, Box<dyn std::error::Error>> {
    for i in 0..num_operations {
        let key = format!("get_bench_key_{}", i);
        let value = format!("get_bench_value_{}", i);
        store.set(&key, &value)?;
    }

    let mut latencies = Vec::with_capacity(num_operations);

    let start = Instant::now();

    for i in 0..num_operations {
        let key = format!("get_bench_key_{}", i);

        let op_start = Instant::now();
        let _value: Option<String> = store.get(&key)?;
        latencies.push(op_start.elapsed());
    }

    let total_duration = start.elapsed();

    Ok(BenchmarkResults::new(
        format!("GET [{}]", format),
        num_operations,
        total_duration,
        &mut latencies,
    ))
}

fn benchmark_mixed_workload(store: &MemoryStore, format: &MarshalFormat, num_operations: usize) -> Result<BenchmarkResults, Box<dyn std::error::Error>> {
    let mut latencies = Vec::with_capacity(num_operations);

    let start = Instant::now();

    for i in 0..num_operations {
        let key = format!("mixed_key_{}", i % 1000);

        let op_start = Instant::now();

        match i % 10 {
            0..=6 => {
                let _value: Option<String> = store.get(&key)?;
            }
            7..=8 => {
                let value = format!("mixed_value_{}", i);
                store.set(&key, &value)?;
            }
            _ => {
                store.delete(&key)?;
            }
        }

        latencies.push(op_start.elapsed());
    }

    let total_duration = start.elapsed();

    Ok(BenchmarkResults::new(
        format!("Mixed Workload [{}]", format),
        num_operations,
        total_duration,
        &mut latencies,
    ))
}

async fn benchmark_concurrent_operations(
    store: &Arc<MemoryStore>,
    format: &MarshalFormat,
    num_tasks: usize,
    ops_per_task: usize,
) -> Result<BenchmarkResults, Box<dyn std::error::Error>> {
    let semaphore = Arc::new(Semaphore::new(in_flight_limit(num_tasks)));
    let mut handles = Vec::new();
    let mut all_latencies = Vec::new();

    let start = Instant::now();

    for task_id in 0..num_tasks {
        let semaphore = Arc::clone(&semaphore);
        let store = Arc::clone(store);

        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire().await.map_err(|e| format!("Semaphore error: {}", e))?;
            let mut latencies = Vec::with_capacity(ops_per_task);

            for i in 0..ops_per_task {
                let key = format!("concurrent_key_{}_{}", task_id, i);
                let value = format!("concurrent_value_{}_{}", task_id, i);

                let op_start = Instant::now();
                store.set(&key, &value).map_err(|e| format!("Set error: {}", e))?;
                latencies.push(op_start.elapsed());
            }

            Ok::<Vec<Duration>, String>(latencies)
        });

        handles.push(handle);
    }

    for handle in handles {
        let latencies = handle.await.map_err(|e| format!("Join error: {}", e))?.map_err(|e| format!("Task error: {}", e))?;
        all_latencies.extend(latencies);
    }

    let total_duration = start.elapsed();
    let total_operations = num_tasks * ops_per_task;

    Ok(BenchmarkResults::new(
        format!("Concurrent ({} tasks) [{}]", num_tasks, format),
        total_operations,
        total_duration,
        &mut all_latencies,
    ))
}
