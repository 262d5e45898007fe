//! A minimal row-major `Vec<f64>` backend implementing [`TensorBackend`],
//! used only by the integration tests in this directory. Not part of the
//! crate's public surface — spec.md places the backend itself out of
//! scope, so this is just enough of one to exercise the planner
//! end-to-end without a GPU or ML framework dependency.

use einops_core::backend::TensorBackend;
use einops_core::recipe::ReduceOp;
use hashbrown::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub data: Vec<f64>,
    pub shape: Vec<i64>,
    pub is_float: bool,
}

/// Builds a tensor from row-major `data` in the given `shape`.
pub fn tensor(data: Vec<f64>, shape: Vec<i64>) -> Tensor {
    assert_eq!(data.len() as i64, shape.iter().product::<i64>());
    Tensor { data, shape, is_float: true }
}

/// Builds an integer-valued tensor (so `mean` is rejected on it).
pub fn int_tensor(data: Vec<i64>, shape: Vec<i64>) -> Tensor {
    let data: Vec<f64> = data.into_iter().map(|v| v as f64).collect();
    Tensor { data, shape, is_float: false }
}

/// Builds a float tensor of the given shape with sequential values `0..n`,
/// handy for tests that just need *some* distinguishable values.
pub fn iota(shape: Vec<i64>) -> Tensor {
    let n: i64 = shape.iter().product();
    tensor((0..n).map(|v| v as f64).collect(), shape)
}

pub struct VecBackend;

fn row_major_strides(shape: &[i64]) -> Vec<i64> {
    let mut strides = vec![1i64; shape.len()];
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

fn unravel(mut flat: i64, shape: &[i64]) -> Vec<i64> {
    let strides = row_major_strides(shape);
    let mut idx = vec![0i64; shape.len()];
    for i in 0..shape.len() {
        idx[i] = flat / strides[i];
        flat %= strides[i];
    }
    idx
}

fn ravel(idx: &[i64], shape: &[i64]) -> i64 {
    let strides = row_major_strides(shape);
    idx.iter().zip(strides.iter()).map(|(&i, &s)| i * s).sum()
}

impl TensorBackend for VecBackend {
    type Tensor = Tensor;

    fn shape(&self, tensor: &Tensor) -> Vec<i64> {
        tensor.shape.clone()
    }

    fn is_float(&self, tensor: &Tensor) -> bool {
        tensor.is_float
    }

    fn reshape(&self, tensor: Tensor, shape: &[i64]) -> Tensor {
        let total = tensor.data.len() as i64;
        let neg = shape.iter().filter(|&&s| s == -1).count();
        let resolved = if neg == 0 {
            shape.to_vec()
        } else {
            let known: i64 = shape.iter().filter(|&&s| s != -1).product();
            let inferred = total / known;
            shape.iter().map(|&s| if s == -1 { inferred } else { s }).collect()
        };
        Tensor { data: tensor.data, shape: resolved, is_float: tensor.is_float }
    }

    fn permute(&self, tensor: Tensor, perm: &[usize]) -> Tensor {
        let out_shape: Vec<i64> = perm.iter().map(|&p| tensor.shape[p]).collect();
        let total: i64 = out_shape.iter().product::<i64>().max(1);
        let mut data = vec![0.0; total as usize];
        for flat in 0..total {
            let out_idx = unravel(flat, &out_shape);
            let mut in_idx = vec![0i64; tensor.shape.len()];
            for (k, &p) in perm.iter().enumerate() {
                in_idx[p] = out_idx[k];
            }
            data[flat as usize] = tensor.data[ravel(&in_idx, &tensor.shape) as usize];
        }
        Tensor { data, shape: out_shape, is_float: tensor.is_float }
    }

    fn reduce(&self, tensor: Tensor, op: ReduceOp, axes: &[usize]) -> Tensor {
        let axes_set: hashbrown::HashSet<usize> = axes.iter().copied().collect();
        let kept_dims: Vec<usize> = (0..tensor.shape.len()).filter(|d| !axes_set.contains(d)).collect();
        let out_shape: Vec<i64> = kept_dims.iter().map(|&d| tensor.shape[d]).collect();
        let reduced_shape: Vec<i64> = axes.iter().map(|&d| tensor.shape[d]).collect();
        let out_total = out_shape.iter().product::<i64>().max(1);
        let reduced_total = reduced_shape.iter().product::<i64>().max(1);

        let init = match op {
            ReduceOp::Min => f64::INFINITY,
            ReduceOp::Max => f64::NEG_INFINITY,
            ReduceOp::Sum | ReduceOp::Mean => 0.0,
            ReduceOp::Prod | ReduceOp::All => 1.0,
            ReduceOp::Any => 0.0,
        };

        let mut data = vec![0.0; out_total as usize];
        for out_flat in 0..out_total {
            let out_idx = unravel(out_flat, &out_shape);
            let mut acc = init;
            for reduced_flat in 0..reduced_total {
                let reduced_idx = unravel(reduced_flat, &reduced_shape);
                let mut in_idx = vec![0i64; tensor.shape.len()];
                for (k, &d) in kept_dims.iter().enumerate() {
                    in_idx[d] = out_idx[k];
                }
                for (k, &d) in axes.iter().enumerate() {
                    in_idx[d] = reduced_idx[k];
                }
                let v = tensor.data[ravel(&in_idx, &tensor.shape) as usize];
                acc = match op {
                    ReduceOp::Min => acc.min(v),
                    ReduceOp::Max => acc.max(v),
                    ReduceOp::Sum | ReduceOp::Mean => acc + v,
                    ReduceOp::Prod => acc * v,
                    ReduceOp::Any => if v != 0.0 { 1.0 } else { acc },
                    ReduceOp::All => if v == 0.0 { 0.0 } else { acc },
                };
            }
            if op == ReduceOp::Mean {
                acc /= reduced_total as f64;
            }
            data[out_flat as usize] = acc;
        }
        Tensor { data, shape: out_shape, is_float: tensor.is_float }
    }

    fn expand_with_axes(&self, tensor: Tensor, n_total: usize, added: &[(usize, i64)]) -> Tensor {
        let added_map: HashMap<usize, i64> = added.iter().copied().collect();
        let mut full_shape = vec![0i64; n_total];
        let mut remaining = tensor.shape.iter();
        for (i, slot) in full_shape.iter_mut().enumerate() {
            *slot = match added_map.get(&i) {
                Some(&len) => len,
                None => *remaining.next().expect("non-added slots cover every original axis"),
            };
        }

        let total = full_shape.iter().product::<i64>().max(1);
        let mut data = vec![0.0; total as usize];
        for flat in 0..total {
            let full_idx = unravel(flat, &full_shape);
            let in_idx: Vec<i64> = (0..n_total)
                .filter(|i| !added_map.contains_key(i))
                .map(|i| full_idx[i])
                .collect();
            data[flat as usize] = tensor.data[ravel(&in_idx, &tensor.shape) as usize];
        }
        Tensor { data, shape: full_shape, is_float: tensor.is_float }
    }

    fn concat(&self, tensors: Vec<Tensor>, axis: usize) -> Tensor {
        let shape0 = tensors[0].shape.clone();
        let outer = shape0[..axis].iter().product::<i64>().max(1);
        let inner = shape0[axis + 1..].iter().product::<i64>().max(1);
        let axis_lens: Vec<i64> = tensors.iter().map(|t| t.shape[axis]).collect();
        let total_axis: i64 = axis_lens.iter().sum();

        let mut out_shape = shape0;
        out_shape[axis] = total_axis;

        let mut data = Vec::with_capacity((outer * total_axis * inner) as usize);
        for o in 0..outer {
            for (t, &alen) in tensors.iter().zip(axis_lens.iter()) {
                let start = (o * alen * inner) as usize;
                let end = start + (alen * inner) as usize;
                data.extend_from_slice(&t.data[start..end]);
            }
        }
        Tensor { data, shape: out_shape, is_float: tensors[0].is_float }
    }

    fn stack(&self, tensors: Vec<Tensor>) -> Tensor {
        let unsqueezed: Vec<Tensor> = tensors
            .into_iter()
            .map(|t| {
                let mut shape = vec![1i64];
                shape.extend(t.shape);
                Tensor { data: t.data, shape, is_float: t.is_float }
            })
            .collect();
        self.concat(unsqueezed, 0)
    }

    fn slice(&self, tensor: &Tensor, axis: usize, start: i64, end: i64) -> Tensor {
        let outer = tensor.shape[..axis].iter().product::<i64>().max(1);
        let inner = tensor.shape[axis + 1..].iter().product::<i64>().max(1);
        let axis_len = tensor.shape[axis];
        let new_len = end - start;

        let mut out_shape = tensor.shape.clone();
        out_shape[axis] = new_len;

        let mut data = Vec::with_capacity((outer * new_len * inner) as usize);
        for o in 0..outer {
            let src_start = (o * axis_len * inner + start * inner) as usize;
            let src_end = src_start + (new_len * inner) as usize;
            data.extend_from_slice(&tensor.data[src_start..src_end]);
        }
        Tensor { data, shape: out_shape, is_float: tensor.is_float }
    }

    fn einsum(&self, pattern: &str, tensors: Vec<Tensor>) -> Tensor {
        let (lhs, rhs) = pattern.split_once("->").expect("compact einsum pattern has an arrow");
        let input_specs: Vec<Vec<char>> = lhs.split(',').map(|s| s.trim().chars().collect()).collect();
        let output_spec: Vec<char> = rhs.trim().chars().collect();

        let mut sizes: HashMap<char, i64> = HashMap::new();
        for (spec, t) in input_specs.iter().zip(tensors.iter()) {
            for (&c, &s) in spec.iter().zip(t.shape.iter()) {
                sizes.insert(c, s);
            }
        }

        let mut all_letters: Vec<char> = Vec::new();
        for spec in &input_specs {
            for &c in spec {
                if !all_letters.contains(&c) {
                    all_letters.push(c);
                }
            }
        }
        let dims: Vec<i64> = all_letters.iter().map(|c| sizes[c]).collect();
        let total_combos = dims.iter().product::<i64>().max(1);

        let out_shape: Vec<i64> = output_spec.iter().map(|c| sizes[c]).collect();
        let out_total = out_shape.iter().product::<i64>().max(1);
        let mut out_data = vec![0.0; out_total as usize];

        for combo_flat in 0..total_combos {
            let combo_idx = unravel(combo_flat, &dims);
            let letter_val: HashMap<char, i64> = all_letters.iter().copied().zip(combo_idx).collect();

            let mut product = 1.0;
            for (spec, t) in input_specs.iter().zip(tensors.iter()) {
                let idx: Vec<i64> = spec.iter().map(|c| letter_val[c]).collect();
                product *= t.data[ravel(&idx, &t.shape) as usize];
            }

            let out_idx: Vec<i64> = output_spec.iter().map(|c| letter_val[c]).collect();
            out_data[ravel(&out_idx, &out_shape) as usize] += product;
        }

        Tensor { data: out_data, shape: out_shape, is_float: true }
    }

    fn arange(&self, start: i64, stop: i64) -> Tensor {
        Tensor {
            data: (start..stop).map(|v| v as f64).collect(),
            shape: vec![stop - start],
            is_float: false,
        }
    }
}
