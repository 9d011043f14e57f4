use ndarray::Array2;
use rand::seq::SliceRandom;

use crate::maxtree::MaxTree;

/// Build the per-pixel label map from a filtered tree.
///
/// One top-down pass assigns each node the label of its nearest significant
/// ancestor (itself if significant, 0 if the chain to the root holds none),
/// then one pass over pixels resolves `node_of_pixel` through that table.
/// O(#pixels + #nodes), and byte-identical across re-runs on the same tree.
pub fn build_label_map(tree: &MaxTree) -> Array2<u32> {
    let mut label: Vec<u32> = vec![0; tree.node_count()];
    let mut next = 1u32;

    for id in 0..tree.node_count() {
        let node = tree.node(id as u32);
        if node.significant {
            label[id] = next;
            next += 1;
        } else if let Some(pid) = node.parent {
            label[id] = label[pid as usize];
        }
    }

    let mut id_map = Array2::<u32>::zeros((tree.height(), tree.width()));
    for (pixel, slot) in id_map.iter_mut().enumerate() {
        *slot = label[tree.node_of_pixel()[pixel] as usize];
    }
    id_map
}

/// Renumber labels to the contiguous range 1..=K, 0 staying background.
///
/// New labels follow first appearance in raster order, so the result is
/// deterministic for `shuffle = false`; `shuffle = true` additionally
/// permutes label identities at random. The partition induced by the input
/// map is preserved either way.
pub fn relabel(id_map: &Array2<u32>, shuffle: bool) -> Array2<u32> {
    let max = id_map.iter().copied().max().unwrap_or(0) as usize;
    let mut remap: Vec<u32> = vec![0; max + 1];
    let mut next = 1u32;

    for &old in id_map.iter() {
        if old != 0 && remap[old as usize] == 0 {
            remap[old as usize] = next;
            next += 1;
        }
    }

    if shuffle && next > 1 {
        let mut perm: Vec<u32> = (1..next).collect();
        perm.shuffle(&mut rand::rng());
        for slot in remap.iter_mut() {
            if *slot != 0 {
                *slot = perm[(*slot - 1) as usize];
            }
        }
    }

    id_map.mapv(|old| remap[old as usize])
}
