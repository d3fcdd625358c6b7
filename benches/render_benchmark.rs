use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use progressive_tracer::camera::{Camera, PerspectiveCamera};
use progressive_tracer::film::AccumulationBuffer;
use progressive_tracer::integrator::WhittedIntegrator;
use progressive_tracer::renderer::PartitionedRenderer;
use progressive_tracer::sampler::{DitherSampler, RandomSampler};
use progressive_tracer::scene::demo::demo_scene;
use progressive_tracer::Point2f;
use rand::Rng;
use std::sync::atomic::AtomicBool;

fn bench(c: &mut Criterion) {
    let (w, h) = (160, 120);
    let scene = demo_scene().unwrap();
    let mut camera = PerspectiveCamera::default();
    camera.set_film_size(w, h);
    camera.update();

    let mut rng = rand::thread_rng();

    let mut group = c.benchmark_group("Demo scene");
    group.throughput(Throughput::Elements(1));
    group.bench_function("nearest hit", |b| {
        b.iter(|| {
            let pixel = Point2f::new(rng.gen_range(0.0..w as f32), rng.gen_range(0.0..h as f32));
            let ray = camera.generate_ray(pixel);
            scene.find_nearest(&ray).map(|hit| hit.dist)
        })
    });
    group.finish();

    let integrator = WhittedIntegrator::new(3);
    let cancel = AtomicBool::new(false);
    let mut sampler = RandomSampler::new_with_seed(1);
    let mut renderer = PartitionedRenderer::new();
    let mut buffer = AccumulationBuffer::new(w, h);

    let mut group = c.benchmark_group("Trace pass");
    group.throughput(Throughput::Elements((w * h) as u64));
    for &partitions in &[1, 4] {
        group.bench_function(format!("{} partitions", partitions), |b| {
            b.iter(|| {
                let sample = sampler.next_offset();
                renderer.render_pass(&scene, &camera, &integrator, &mut buffer, partitions, sample, &cancel).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
