use alloy::sol;

sol! {
    /// Subset of ERC-20 used for selling a holding through a router
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string);
    }
}

sol! {
    /// Uniswap V2 style router, token to native asset leg only
    interface IUniswapV2Router02 {
        function swapExactTokensForETH(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] path,
            address to,
            uint256 deadline
        ) external returns (uint256[] amounts);
    }
}
