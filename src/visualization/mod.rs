pub mod eddsim_vis3d;
